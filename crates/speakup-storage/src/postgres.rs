use async_trait::async_trait;
use speakup_core::repository::Result;
use speakup_core::{
    ArticleRecord, ArticleRepository, ContentRepository, CoreError, Language, StorageError,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::trace;

const SCHEMA: &str = include_str!("../ddl/postgres/news_articles.sql");

/// PostgreSQL implementation of the article repository.
///
/// Reads the `news_articles` table owned by the content-management side of
/// the site. Legacy paths are stored as empty strings when absent, which is
/// how the CMS writes blank fields.
#[derive(Debug, Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    /// Creates a repository from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `news_articles` table and its indexes if missing.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn legacy_column(language: Language) -> &'static str {
    match language {
        Language::Uk => "old_url_uk",
        Language::Ru => "old_url_ru",
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn record_from_row(row: &PgRow) -> Result<ArticleRecord> {
    let slug_uk: String = row.try_get("slug_uk").map_err(map_sqlx_error)?;
    let slug_ru: Option<String> = row.try_get("slug_ru").map_err(map_sqlx_error)?;
    let old_path_uk: Option<String> = row.try_get("old_url_uk").map_err(map_sqlx_error)?;
    let old_path_ru: Option<String> = row.try_get("old_url_ru").map_err(map_sqlx_error)?;
    let is_published: bool = row.try_get("is_published").map_err(map_sqlx_error)?;

    record_from_parts(slug_uk, slug_ru, old_path_uk, old_path_ru, is_published)
}

/// Rebuilds a record from stored columns, rejecting slugs the model would not accept.
fn record_from_parts(
    slug_uk: String,
    slug_ru: Option<String>,
    old_path_uk: Option<String>,
    old_path_ru: Option<String>,
    is_published: bool,
) -> Result<ArticleRecord> {
    let invalid = |err: CoreError| StorageError::InvalidData(err.to_string());

    let mut record = ArticleRecord::new(slug_uk).map_err(invalid)?;
    if let Some(slug_ru) = blank_to_none(slug_ru) {
        record = record.with_slug_ru(slug_ru).map_err(invalid)?;
    }
    if let Some(path) = blank_to_none(old_path_uk) {
        record = record.with_old_path(Language::Uk, path);
    }
    if let Some(path) = blank_to_none(old_path_ru) {
        record = record.with_old_path(Language::Ru, path);
    }
    if !is_published {
        record = record.unpublished();
    }
    Ok(record)
}

#[async_trait]
impl ContentRepository for PgArticleRepository {
    async fn find_by_legacy_path(
        &self,
        path: &str,
        language: Language,
    ) -> Result<Option<ArticleRecord>> {
        trace!(path, %language, "querying article by legacy path");

        if path.is_empty() {
            return Ok(None);
        }

        // Column names come from a closed set, never from input.
        let query = format!(
            r#"
            SELECT slug_uk, slug_ru, old_url_uk, old_url_ru, is_published
            FROM news_articles
            WHERE {} = $1
              AND is_published
            ORDER BY id
            LIMIT 1
            "#,
            legacy_column(language)
        );

        let row = sqlx::query(&query)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    async fn insert(&self, record: ArticleRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO news_articles (slug_uk, slug_ru, old_url_uk, old_url_ru, is_published)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&record.slug_uk)
        .bind(record.slug_ru.as_deref())
        .bind(record.old_path_uk.as_deref().unwrap_or(""))
        .bind(record.old_path_ru.as_deref().unwrap_or(""))
        .bind(record.is_published)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(record.slug_uk)),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn delete(&self, slug_uk: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news_articles WHERE slug_uk = $1")
            .bind(slug_uk)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
