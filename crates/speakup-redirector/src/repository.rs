//! Repository decorators used by the redirector.

pub mod cached;

pub use cached::CachedRepository;
