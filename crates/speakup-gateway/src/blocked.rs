//! WordPress paths answered with `410 Gone`.

use typed_builder::TypedBuilder;

pub const DEFAULT_BLOCKED_PREFIXES: &[&str] = &[
    "/wp-admin",
    "/wp-content",
    "/wp-includes",
    "/wp-json",
    "/wp-login.php",
    "/wp-config.php",
    "/xmlrpc.php",
];

fn default_prefixes() -> Vec<String> {
    DEFAULT_BLOCKED_PREFIXES.iter().map(|s| s.to_string()).collect()
}

/// Paths of the old CMS that must tell crawlers the resource is gone.
///
/// A path is blocked when it starts with one of `prefixes`, or when it
/// starts with `script_prefix` and ends with `script_suffix` (the long tail
/// of `/wp-*.php` scripts).
#[derive(Debug, Clone, TypedBuilder)]
pub struct BlockedPaths {
    #[builder(default = default_prefixes())]
    pub prefixes: Vec<String>,
    #[builder(default = "/wp-".to_string(), setter(into))]
    pub script_prefix: String,
    #[builder(default = ".php".to_string(), setter(into))]
    pub script_suffix: String,
}

impl Default for BlockedPaths {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BlockedPaths {
    pub fn is_blocked(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || (path.starts_with(&self.script_prefix) && path.ends_with(&self.script_suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_asset_prefixes_are_blocked() {
        let blocked = BlockedPaths::default();
        assert!(blocked.is_blocked("/wp-admin/anything"));
        assert!(blocked.is_blocked("/wp-admin"));
        assert!(blocked.is_blocked("/wp-content/uploads/2019/05/logo.png"));
        assert!(blocked.is_blocked("/wp-json/wp/v2/posts"));
        assert!(blocked.is_blocked("/xmlrpc.php"));
    }

    #[test]
    fn known_scripts_are_blocked() {
        let blocked = BlockedPaths::default();
        assert!(blocked.is_blocked("/wp-config.php"));
        assert!(blocked.is_blocked("/wp-login.php?action=register"));
    }

    #[test]
    fn script_pattern_covers_the_long_tail() {
        let blocked = BlockedPaths::default();
        assert!(blocked.is_blocked("/wp-shop.php"));
        assert!(blocked.is_blocked("/wp-cron.php"));
        assert!(!blocked.is_blocked("/wp-shop.html"));
    }

    #[test]
    fn site_paths_are_not_blocked() {
        let blocked = BlockedPaths::default();
        assert!(!blocked.is_blocked("/"));
        assert!(!blocked.is_blocked("/programs/toefl"));
        assert!(!blocked.is_blocked("/news/wp-admin-tips"));
        assert!(!blocked.is_blocked("/index.php"));
    }
}
