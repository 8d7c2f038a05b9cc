//! The emoji catalog: the fixed universe of countable symbols.
//!
//! The catalog is a pre-built, versioned JSON asset mapping each emoji
//! character sequence to a base64-encoded PNG rendering of it. It is loaded
//! wholesale into memory at startup and never generated or mutated by this
//! tool. Only sequences present in the catalog are ever counted — there is
//! no heuristic pictographic-range detection.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EmojistatError, Result};

/// Emoji → base64 PNG payload, keyed by the exact character sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct EmojiCatalog {
    entries: BTreeMap<String, String>,
}

impl EmojiCatalog {
    /// Loads a catalog from a JSON file of the form
    /// `{"🙂": "<base64 png>", ...}`.
    ///
    /// An empty catalog is rejected: it would define nothing to count.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| EmojistatError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: EmojiCatalog = serde_json::from_reader(BufReader::new(file)).map_err(
            |source| EmojistatError::CatalogParse {
                path: path.to_path_buf(),
                source,
            },
        )?;
        if catalog.entries.is_empty() {
            return Err(EmojistatError::EmptyCatalog);
        }
        Ok(catalog)
    }

    /// Builds a catalog from in-memory pairs. Intended for tests.
    pub fn from_entries<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Iterates the catalog's emoji sequences.
    pub fn emojis(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the base64 PNG payload for an emoji, if it is in the catalog.
    pub fn image(&self, emoji: &str) -> Option<&str> {
        self.entries.get(emoji).map(String::as_str)
    }

    /// Returns `true` if the sequence is a catalog member.
    pub fn contains(&self, emoji: &str) -> bool {
        self.entries.contains_key(emoji)
    }

    /// Number of catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_entries_lookup() {
        let catalog = EmojiCatalog::from_entries([("🙂", "c2xpY2U="), ("🎉", "cGFydHk=")]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("🙂"));
        assert!(!catalog.contains("😀"));
        assert_eq!(catalog.image("🎉"), Some("cGFydHk="));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"🙂": "YQ==", "👍": "Yg=="}}"#).unwrap();

        let catalog = EmojiCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.image("🙂"), Some("YQ=="));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EmojiCatalog::load(Path::new("/does/not/exist.json")).unwrap_err();
        assert!(matches!(err, EmojistatError::CatalogRead { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = EmojiCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, EmojistatError::CatalogParse { .. }));
    }

    #[test]
    fn test_load_empty_catalog_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let err = EmojiCatalog::load(file.path()).unwrap_err();
        assert!(matches!(err, EmojistatError::EmptyCatalog));
    }
}
