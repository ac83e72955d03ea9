pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgArticleRepository;
pub use speakup_core::repository::Result;
pub use speakup_core::{ArticleRecord, ArticleRepository, ContentRepository, StorageError};
