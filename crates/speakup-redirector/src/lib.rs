//! Legacy-URL redirect resolution for the SpeakUp site.
//!
//! This crate provides a [`LegacyRedirectService`] that maps paths of the old
//! WordPress/WooCommerce site to their current location. It combines a
//! compiled-in [`RedirectTable`] with an [`ArticleRedirector`] that reads the
//! legacy paths recorded on news articles. The content repository can be
//! wrapped in a [`CachedRepository`] to keep repeated lookups off the store.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use speakup_redirector::{
//!     ArticleLookupConfig, ArticleRedirector, CachedRepository, LegacyPathCache,
//!     LegacyRedirectService, RedirectTable,
//! };
//! use speakup_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let table = Arc::new(RedirectTable::builtin()?);
//! let repository = CachedRepository::new(InMemoryRepository::new(), LegacyPathCache::new());
//! let articles = ArticleRedirector::new(repository, ArticleLookupConfig::default());
//! let service = LegacyRedirectService::new(table, articles);
//!
//! if let Some(redirect) = service.resolve("/faqs/").await {
//!     println!("301 -> {}", redirect.target_path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod service;
pub mod table;

pub use article::{ArticleLookupConfig, ArticleRedirector};
pub use cache::{CacheConfig, LegacyPathCache};
pub use error::{RedirectorError, Result};
pub use redirector::Redirector;
pub use repository::CachedRepository;
pub use service::LegacyRedirectService;
pub use table::{RedirectEntry, RedirectTable};
