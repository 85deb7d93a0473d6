//! Normalized file-extension keys.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A normalized file extension used as a dispatch key.
///
/// Suffixes are always lower-case and always carry a leading dot, so
/// `Suffix::new("JSON")`, `Suffix::new(".Json")`, and `Suffix::new(".json")`
/// are the same key. Normalization happens at construction; every `Suffix`
/// in circulation is already canonical in spelling (alias resolution is a
/// separate, registry-level concern).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suffix(String);

impl Suffix {
    /// Create a suffix from any extension spelling.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('.');
        Suffix(format!(".{}", trimmed.to_lowercase()))
    }

    /// Extract the suffix of a path, if it has one.
    pub fn of_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).map(Self::new)
    }

    /// The normalized string form, including the leading dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Suffix {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Suffix {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalizes_case_and_dot() {
        assert_eq!(Suffix::new("JSON"), Suffix::new(".json"));
        assert_eq!(Suffix::new(".Json"), Suffix::new("json"));
        assert_eq!(Suffix::new(".yaml").as_str(), ".yaml");
    }

    #[test]
    fn of_path_extracts_extension() {
        assert_eq!(
            Suffix::of_path(Path::new("data/results.CSV")),
            Some(Suffix::new(".csv"))
        );
        assert_eq!(Suffix::of_path(Path::new("data/no_extension")), None);
    }

    #[test]
    fn of_path_uses_final_extension() {
        assert_eq!(
            Suffix::of_path(Path::new("archive.tar.gz")),
            Some(Suffix::new(".gz"))
        );
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in "[a-zA-Z0-9.]{0,8}") {
            let once = Suffix::new(&raw);
            let twice = Suffix::new(once.as_str());
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.as_str().starts_with('.'));
            prop_assert_eq!(once.as_str().to_lowercase(), once.as_str());
        }
    }
}
