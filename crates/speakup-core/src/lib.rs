//! Core types and traits for the SpeakUp edge service.
//!
//! This crate provides the types shared by the redirect resolver, the
//! storage backends and the HTTP gateway: path normalization, the read-only
//! request view, article records and the content repository contract.

pub mod error;
pub mod language;
pub mod path;
pub mod redirect;
pub mod repository;
pub mod request;

pub use error::{CoreError, StorageError};
pub use language::Language;
pub use redirect::{RedirectKind, ResolvedRedirect};
pub use repository::{ArticleRecord, ArticleRepository, ContentRepository, NEWS_PREFIX};
pub use request::RequestContext;
