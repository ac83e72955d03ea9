use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use speakup_core::repository::Result;
use speakup_core::{ArticleRecord, ArticleRepository, ContentRepository, Language, StorageError};

/// In-memory implementation of the article repository using DashMap.
///
/// Records are keyed by their primary slug. Legacy-path lookups scan the
/// map, which is fine for the few hundred articles the site carries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, ArticleRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn find_by_legacy_path(
        &self,
        path: &str,
        language: Language,
    ) -> Result<Option<ArticleRecord>> {
        let found = self
            .storage
            .iter()
            .find(|entry| entry.is_published && entry.old_path(language) == Some(path))
            .map(|entry| entry.value().clone());
        Ok(found)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryRepository {
    async fn insert(&self, record: ArticleRecord) -> Result<()> {
        match self.storage.entry(record.slug_uk.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(record.slug_uk)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn delete(&self, slug_uk: &str) -> Result<bool> {
        Ok(self.storage.remove(slug_uk).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(slug: &str) -> ArticleRecord {
        ArticleRecord::new(slug).unwrap()
    }

    #[tokio::test]
    async fn insert_and_find_by_legacy_path() {
        let repo = InMemoryRepository::new();
        repo.insert(article("new-slug").with_old_path(Language::Uk, "/news/old-slug"))
            .await
            .unwrap();

        let found = repo
            .find_by_legacy_path("/news/old-slug", Language::Uk)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.slug_uk, "new-slug");
    }

    #[tokio::test]
    async fn lookup_is_language_specific() {
        let repo = InMemoryRepository::new();
        repo.insert(article("new-slug").with_old_path(Language::Ru, "/news/staryj"))
            .await
            .unwrap();

        assert!(repo
            .find_by_legacy_path("/news/staryj", Language::Uk)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_legacy_path("/news/staryj", Language::Ru)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn unpublished_articles_are_not_found() {
        let repo = InMemoryRepository::new();
        repo.insert(
            article("draft")
                .with_old_path(Language::Uk, "/news/draft-old")
                .unpublished(),
        )
        .await
        .unwrap();

        let found = repo
            .find_by_legacy_path("/news/draft-old", Language::Uk)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn insert_conflict() {
        let repo = InMemoryRepository::new();
        repo.insert(article("dup")).await.unwrap();

        let err = repo.insert(article("dup")).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_existing() {
        let repo = InMemoryRepository::new();
        repo.insert(article("gone")).await.unwrap();

        assert!(repo.delete("gone").await.unwrap());
        assert!(!repo.delete("gone").await.unwrap());
        assert!(repo.is_empty());
    }
}
