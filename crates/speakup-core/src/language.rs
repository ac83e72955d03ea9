use crate::error::CoreError;
use std::fmt::Display;
use std::str::FromStr;

/// A content language served by the site.
///
/// Ukrainian is the default language and is served without a URL prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    Uk,
    Ru,
}

impl Language {
    /// Every language, default first. Lookups that try each language use this order.
    pub const ALL: [Language; 2] = [Language::Uk, Language::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Uk => "uk",
            Language::Ru => "ru",
        }
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" | "ua" => Ok(Language::Uk),
            "ru" => Ok(Language::Ru),
            other => Err(CoreError::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes() {
        assert_eq!("uk".parse::<Language>().unwrap(), Language::Uk);
        assert_eq!("UA".parse::<Language>().unwrap(), Language::Uk);
        assert_eq!("ru".parse::<Language>().unwrap(), Language::Ru);
    }

    #[test]
    fn reject_unknown_code() {
        let err = "en".parse::<Language>().unwrap_err();
        assert_eq!(err, CoreError::UnsupportedLanguage("en".to_string()));
    }

    #[test]
    fn default_is_first() {
        assert_eq!(Language::ALL[0], Language::default());
    }
}
