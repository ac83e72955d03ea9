//! Trailing-slash canonicalization for path comparison.

/// Strips the trailing slash from `path` unless it is the root `/`.
///
/// A run of trailing slashes is removed as a whole, which keeps the function
/// idempotent for every input. A path made only of slashes becomes `/`.
///
/// ```
/// use speakup_core::path::normalize;
///
/// assert_eq!(normalize("/about/"), "/about");
/// assert_eq!(normalize("/"), "/");
/// ```
pub fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(normalize("/about/"), "/about");
        assert_eq!(normalize("/programs/toefl/"), "/programs/toefl");
    }

    #[test]
    fn keeps_root() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("//"), "/");
    }

    #[test]
    fn leaves_bare_paths_alone() {
        assert_eq!(normalize("/about"), "/about");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for p in [
            "", "/", "//", "/about", "/about/", "/about//", "/news/a/b/", "abc/", "/faqs/",
        ] {
            assert_eq!(normalize(normalize(p)), normalize(p), "input {p:?}");
        }
    }
}
