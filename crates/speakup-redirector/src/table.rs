//! Compiled-in redirect table for paths of the old WordPress/WooCommerce site.

use crate::error::{RedirectorError, Result};
use speakup_core::path::normalize;
use std::collections::{HashMap, HashSet};

/// Legacy path -> current path, in declaration order.
pub const BUILTIN_REDIRECTS: &[(&str, &str)] = &[
    // WooCommerce products -> programs
    ("/pidgotovka-do-ispitu-ielts", "/programs/ielts"),
    ("/pidgotovka-do-zno-z-anglijskoi-movi", "/programs/pidgotovka-zno"),
    ("/pidgotovka-do-ispitu-toefl", "/programs/toefl"),
    ("/anglijska-dlya-ditej-kids-30", "/programs/kids"),
    (
        "/product/misyacz-bezlimitu/",
        "/programs/bezlimitnij-onlajn-kurs-anglijskoyi-movi",
    ),
    // Old WordPress pages
    ("/contact/", "/contacts"),
    ("/faqs/", "/faq"),
    ("/blog/", "/news/"),
    // Trailing slash -> bare
    ("/about/", "/about"),
    ("/programs/toefl/", "/programs/toefl"),
    // Course levels
    ("/2-rivni-anglijskoji-movi", "/programs/english-for-beginners"),
    (
        "/4-rivni-anglijskoji-movi-10-12-misyacziv-navchannya",
        "/programs/group",
    ),
    ("/2-rivni-6-misyacziv-navchannya", "/programs/group"),
    ("/3-rivni-anglijskoji-movi_prodovzhennya", "/programs/group"),
    ("/5-rivni-anglijskoji-movi-prodovgennya", "/programs/group"),
];

/// A single legacy redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEntry {
    pub old_path: String,
    pub new_path: String,
}

impl RedirectEntry {
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }
}

/// Immutable old-path -> new-path mapping.
///
/// Built once at startup and shared read-only. Construction rejects duplicate
/// sources, self-redirects and cycles.
#[derive(Debug, Clone)]
pub struct RedirectTable {
    entries: Vec<RedirectEntry>,
    exact: HashMap<String, usize>,
    // normalized source -> entry; exact bare keys take the slot first
    normalized: HashMap<String, usize>,
}

impl RedirectTable {
    /// Builds and validates a table from `entries`.
    pub fn new(entries: impl IntoIterator<Item = RedirectEntry>) -> Result<Self> {
        let entries: Vec<RedirectEntry> = entries.into_iter().collect();
        let mut exact = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            for path in [&entry.old_path, &entry.new_path] {
                if !path.starts_with('/') {
                    return Err(RedirectorError::RelativePath(path.clone()));
                }
            }
            if entry.old_path == entry.new_path {
                return Err(RedirectorError::SelfRedirect(entry.old_path.clone()));
            }
            if exact.insert(entry.old_path.clone(), index).is_some() {
                return Err(RedirectorError::DuplicateSource(entry.old_path.clone()));
            }
        }

        let mut normalized = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if normalize(&entry.old_path) == entry.old_path {
                normalized.insert(entry.old_path.clone(), index);
            }
        }
        for (index, entry) in entries.iter().enumerate() {
            normalized
                .entry(normalize(&entry.old_path).to_string())
                .or_insert(index);
        }

        let table = Self {
            entries,
            exact,
            normalized,
        };
        table.check_cycles()?;
        Ok(table)
    }

    /// The table of legacy paths known from the old site.
    pub fn builtin() -> Result<Self> {
        Self::new(
            BUILTIN_REDIRECTS
                .iter()
                .map(|(old, new)| RedirectEntry::new(*old, *new)),
        )
    }

    /// Looks up the redirect target for `path`.
    ///
    /// The raw path is tried first. On a miss the normalized path is matched
    /// against normalized sources, so `/contact` and `/contact//` both reach
    /// the `/contact/` entry. A match whose target equals `path` is not a
    /// redirect.
    pub fn lookup_static(&self, path: &str) -> Option<&str> {
        if let Some(&index) = self.exact.get(path) {
            return Some(self.entries[index].new_path.as_str());
        }

        self.normalized
            .get(normalize(path))
            .map(|&index| self.entries[index].new_path.as_str())
            .filter(|target| *target != path)
    }

    /// Every hop taken when following redirects from `path`, `path` first.
    ///
    /// Fails with [`RedirectorError::Cycle`] when a hop revisits a path.
    pub fn chain(&self, path: &str) -> Result<Vec<String>> {
        let mut hops = vec![path.to_string()];
        let mut seen = HashSet::from([path.to_string()]);
        let mut current = path.to_string();

        while let Some(next) = self.lookup_static(&current) {
            let next = next.to_string();
            hops.push(next.clone());
            if !seen.insert(next.clone()) {
                return Err(RedirectorError::Cycle(hops));
            }
            current = next;
        }

        Ok(hops)
    }

    fn check_cycles(&self) -> Result<()> {
        for entry in &self.entries {
            self.chain(&entry.old_path)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RedirectEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.exact.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> Result<RedirectTable> {
        RedirectTable::new(entries.iter().map(|(o, n)| RedirectEntry::new(*o, *n)))
    }

    #[test]
    fn builtin_table_is_valid() {
        let table = RedirectTable::builtin().unwrap();
        assert_eq!(table.len(), BUILTIN_REDIRECTS.len());
    }

    #[test]
    fn every_builtin_entry_resolves_to_its_target() {
        let table = RedirectTable::builtin().unwrap();
        for entry in table.iter() {
            assert_eq!(
                table.lookup_static(&entry.old_path),
                Some(entry.new_path.as_str()),
                "source {}",
                entry.old_path
            );
        }
    }

    #[test]
    fn normalized_sources_resolve_when_not_separately_present() {
        let table = RedirectTable::builtin().unwrap();
        for entry in table.iter() {
            let bare = normalize(&entry.old_path);
            if bare == entry.old_path || table.contains(bare) || bare == entry.new_path {
                continue;
            }
            assert_eq!(
                table.lookup_static(bare),
                Some(entry.new_path.as_str()),
                "normalized source {bare}"
            );
        }
    }

    #[test]
    fn trailing_slash_request_matches_bare_source() {
        let table = RedirectTable::builtin().unwrap();
        assert_eq!(
            table.lookup_static("/pidgotovka-do-ispitu-ielts/"),
            Some("/programs/ielts")
        );
    }

    #[test]
    fn slash_canonicalization_does_not_loop() {
        let table = RedirectTable::builtin().unwrap();
        assert_eq!(table.lookup_static("/about/"), Some("/about"));
        assert_eq!(table.lookup_static("/about"), None);
    }

    #[test]
    fn raw_path_takes_priority_over_normalized() {
        let table = table(&[("/x/", "/raw-target"), ("/x", "/bare-target")]).unwrap();
        assert_eq!(table.lookup_static("/x/"), Some("/raw-target"));
        assert_eq!(table.lookup_static("/x"), Some("/bare-target"));
        assert_eq!(table.lookup_static("/x//"), Some("/bare-target"));
    }

    #[test]
    fn unknown_path_misses() {
        let table = RedirectTable::builtin().unwrap();
        assert_eq!(table.lookup_static("/programs/toefl"), None);
        assert_eq!(table.lookup_static("/"), None);
    }

    #[test]
    fn builtin_chains_terminate() {
        let table = RedirectTable::builtin().unwrap();
        for entry in table.iter() {
            let hops = table.chain(&entry.old_path).unwrap();
            assert!(hops.len() >= 2);
        }
    }

    #[test]
    fn chained_entries_take_one_hop_each() {
        let table = table(&[("/ua/blog/", "/blog/"), ("/blog/", "/news/")]).unwrap();
        assert_eq!(table.lookup_static("/ua/blog/"), Some("/blog/"));
        assert_eq!(table.lookup_static("/blog/"), Some("/news/"));
        assert_eq!(
            table.chain("/ua/blog/").unwrap(),
            vec!["/ua/blog/", "/blog/", "/news/"]
        );
    }

    #[test]
    fn cycle_is_rejected() {
        let err = table(&[("/a", "/b"), ("/b", "/c"), ("/c", "/a")]).unwrap_err();
        assert!(matches!(err, RedirectorError::Cycle(_)));
    }

    #[test]
    fn cycle_through_normalization_is_rejected() {
        let err = table(&[("/a/", "/b"), ("/b", "/a")]).unwrap_err();
        assert!(matches!(err, RedirectorError::Cycle(_)));
    }

    #[test]
    fn duplicate_source_is_rejected() {
        let err = table(&[("/a", "/b"), ("/a", "/c")]).unwrap_err();
        assert_eq!(err, RedirectorError::DuplicateSource("/a".to_string()));
    }

    #[test]
    fn self_redirect_is_rejected() {
        let err = table(&[("/a", "/a")]).unwrap_err();
        assert_eq!(err, RedirectorError::SelfRedirect("/a".to_string()));
    }

    #[test]
    fn relative_path_is_rejected() {
        let err = table(&[("a", "/b")]).unwrap_err();
        assert_eq!(err, RedirectorError::RelativePath("a".to_string()));
    }

    #[test]
    fn iteration_keeps_declaration_order() {
        let table = RedirectTable::builtin().unwrap();
        let sources: Vec<&str> = table.iter().map(|e| e.old_path.as_str()).collect();
        let declared: Vec<&str> = BUILTIN_REDIRECTS.iter().map(|(o, _)| *o).collect();
        assert_eq!(sources, declared);
    }
}
