// Supported languages and their per-language toolchain facts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Python,
    C,
}

impl Language {
    /// File extension of the source artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Javascript => "js",
            Language::Python => "py",
            Language::C => "c",
        }
    }

    /// Whether a compile step precedes execution.
    pub fn requires_compilation(&self) -> bool {
        matches!(self, Language::C)
    }

    /// Package manager used by the dependency provisioner, if the language
    /// has one.
    pub fn package_manager(&self) -> Option<PackageManager> {
        match self {
            Language::Javascript => Some(PackageManager::Npm),
            Language::Python => Some(PackageManager::Pip),
            Language::C => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::C => "c",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "javascript" => Ok(Language::Javascript),
            "python" => Ok(Language::Python),
            "c" => Ok(Language::C),
            other => Err(EngineError::UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pip,
    Npm,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_languages() {
        assert_eq!("javascript".parse::<Language>().unwrap(), Language::Javascript);
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("c".parse::<Language>().unwrap(), Language::C);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = "ruby".parse::<Language>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedLanguage(ref l) if l == "ruby"));
        assert!(err.is_bad_request());
    }

    #[test]
    fn rejects_wrong_case() {
        // The wire format is exact lowercase identifiers.
        assert!("Python".parse::<Language>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for lang in [Language::Javascript, Language::Python, Language::C] {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let lang: Language = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(lang, Language::Javascript);
        assert_eq!(serde_json::to_string(&Language::C).unwrap(), "\"c\"");
    }

    #[test]
    fn only_c_requires_compilation() {
        assert!(Language::C.requires_compilation());
        assert!(!Language::Python.requires_compilation());
        assert!(!Language::Javascript.requires_compilation());
    }

    #[test]
    fn c_has_no_package_manager() {
        assert_eq!(Language::C.package_manager(), None);
        assert_eq!(Language::Python.package_manager(), Some(PackageManager::Pip));
        assert_eq!(Language::Javascript.package_manager(), Some(PackageManager::Npm));
    }
}
