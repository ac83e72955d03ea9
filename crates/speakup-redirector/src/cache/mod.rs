//! Caches for legacy-path lookups.

pub mod moka;

pub use self::moka::{CacheConfig, LegacyPathCache};
