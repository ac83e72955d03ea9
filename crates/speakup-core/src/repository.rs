use crate::error::{CoreError, StorageError};
use crate::language::Language;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// URL section under which news articles live.
pub const NEWS_PREFIX: &str = "/news/";

const MAX_SLUG_LENGTH: usize = 200;

/// The slice of a news article the redirect resolver reads.
///
/// Each language revision may have had its own URL on the old site, so the
/// legacy path is recorded per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Primary (Ukrainian) slug. Unique across articles.
    pub slug_uk: String,
    /// Russian slug, when the Russian revision has its own.
    pub slug_ru: Option<String>,
    /// Path the Ukrainian revision had on the old site.
    pub old_path_uk: Option<String>,
    /// Path the Russian revision had on the old site.
    pub old_path_ru: Option<String>,
    pub is_published: bool,
}

impl ArticleRecord {
    /// Creates a published article with the given primary slug.
    ///
    /// Slugs are 1-200 characters of letters, digits, hyphens or underscores.
    pub fn new(slug_uk: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let slug_uk = slug_uk.into();
        validate_slug(&slug_uk)?;
        Ok(Self {
            slug_uk,
            slug_ru: None,
            old_path_uk: None,
            old_path_ru: None,
            is_published: true,
        })
    }

    pub fn with_slug_ru(mut self, slug_ru: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let slug_ru = slug_ru.into();
        validate_slug(&slug_ru)?;
        self.slug_ru = Some(slug_ru);
        Ok(self)
    }

    pub fn with_old_path(mut self, language: Language, path: impl Into<String>) -> Self {
        let path = Some(path.into());
        match language {
            Language::Uk => self.old_path_uk = path,
            Language::Ru => self.old_path_ru = path,
        }
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }

    /// The legacy path recorded for `language`, if any.
    pub fn old_path(&self, language: Language) -> Option<&str> {
        match language {
            Language::Uk => self.old_path_uk.as_deref(),
            Language::Ru => self.old_path_ru.as_deref(),
        }
    }

    /// Current path of the article for `language`.
    ///
    /// Russian uses its own slug when one exists and falls back to the
    /// Ukrainian slug otherwise.
    pub fn current_path(&self, language: Language) -> String {
        let slug = match (language, self.slug_ru.as_deref()) {
            (Language::Ru, Some(slug_ru)) if !slug_ru.is_empty() => slug_ru,
            _ => self.slug_uk.as_str(),
        };
        format!("{NEWS_PREFIX}{slug}")
    }

    /// Language-independent canonical path (the default-language path).
    pub fn canonical_path(&self) -> String {
        self.current_path(Language::default())
    }
}

fn validate_slug(slug: &str) -> std::result::Result<(), CoreError> {
    if slug.is_empty() || slug.chars().count() > MAX_SLUG_LENGTH {
        return Err(CoreError::InvalidSlug(format!(
            "length must be between 1 and {MAX_SLUG_LENGTH}, got {}",
            slug.chars().count()
        )));
    }

    if !slug
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::InvalidSlug(format!(
            "must contain only letters, digits, hyphens or underscores: '{slug}'"
        )));
    }

    Ok(())
}

/// Read access to content records, as needed by the redirect resolver.
#[async_trait]
pub trait ContentRepository: Send + Sync + 'static {
    /// Finds the published article whose legacy path for `language` equals `path`.
    ///
    /// Legacy paths are expected to be unique per language; when several
    /// records match, implementations return the first one.
    async fn find_by_legacy_path(
        &self,
        path: &str,
        language: Language,
    ) -> Result<Option<ArticleRecord>>;
}

#[async_trait]
pub trait ArticleRepository: ContentRepository {
    /// Inserts a new article. Returns `Err(Conflict)` if the slug is taken.
    async fn insert(&self, record: ArticleRecord) -> Result<()>;

    /// Deletes the article with the given primary slug.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, slug_uk: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_uses_primary_slug() {
        let record = ArticleRecord::new("new-slug")
            .unwrap()
            .with_slug_ru("novyj-slug")
            .unwrap();
        assert_eq!(record.canonical_path(), "/news/new-slug");
    }

    #[test]
    fn russian_path_prefers_russian_slug() {
        let record = ArticleRecord::new("new-slug")
            .unwrap()
            .with_slug_ru("novyj-slug")
            .unwrap();
        assert_eq!(record.current_path(Language::Ru), "/news/novyj-slug");
        assert_eq!(record.current_path(Language::Uk), "/news/new-slug");
    }

    #[test]
    fn russian_path_falls_back_to_primary_slug() {
        let record = ArticleRecord::new("new-slug").unwrap();
        assert_eq!(record.current_path(Language::Ru), "/news/new-slug");
    }

    #[test]
    fn old_path_per_language() {
        let record = ArticleRecord::new("a")
            .unwrap()
            .with_old_path(Language::Ru, "/news/staryj");
        assert_eq!(record.old_path(Language::Ru), Some("/news/staryj"));
        assert_eq!(record.old_path(Language::Uk), None);
    }

    #[test]
    fn slug_validation() {
        assert!(ArticleRecord::new("ok-slug_1").is_ok());
        assert!(ArticleRecord::new("новина-1").is_ok());
        assert!(ArticleRecord::new("").is_err());
        assert!(ArticleRecord::new("a/b").is_err());
        assert!(ArticleRecord::new("a".repeat(201)).is_err());
    }
}
