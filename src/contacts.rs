//! Contact directory loading and target resolution.
//!
//! The contacts database maps a jid (the WhatsApp identifier of a contact,
//! group, or broadcast list) to a human-readable display name. This module
//! loads that mapping once into an immutable [`ContactBook`] and resolves a
//! user-supplied [`TargetSelector`] to exactly one jid.
//!
//! # Example
//!
//! ```rust
//! use emojistat::contacts::{ContactBook, TargetSelector};
//!
//! let mut book = ContactBook::from_pairs([
//!     ("123@s.whatsapp.net", "Alice"),
//!     ("456@g.us", "Team Alpha"),
//! ]);
//!
//! let selector = TargetSelector::Pattern("alpha".to_string());
//! let jid = book.resolve(&selector)?;
//! assert_eq!(jid, "456@g.us");
//!
//! // The synthetic self contact is injected only after resolution so it
//! // can never satisfy a pattern.
//! book.insert_self();
//! assert_eq!(book.display_name("me"), "Me");
//! # Ok::<(), emojistat::EmojistatError>(())
//! ```

use std::collections::HashMap;
use std::path::Path;

use regex::RegexBuilder;
use rusqlite::Connection;

use crate::error::{EmojistatError, Result};

/// Reserved sender id for self-authored messages.
pub const SELF_JID: &str = "me";

/// Display label for the synthetic self contact.
pub const SELF_NAME: &str = "Me";

/// How the user identifies the contact or group to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Exact jid, case sensitive. Useful when two contacts share a name.
    Id(String),
    /// Case-insensitive regular expression matched against display names.
    Pattern(String),
}

/// Immutable jid → display name lookup, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ContactBook {
    names: HashMap<String, String>,
}

impl ContactBook {
    /// Loads all contacts with a non-NULL display name from a contacts
    /// database (`wa.db`).
    pub fn load(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(&conn)
    }

    /// Loads contacts from an already-open connection.
    pub fn from_connection(conn: &Connection) -> Result<Self> {
        let mut stmt =
            conn.prepare("SELECT jid, display_name FROM wa_contacts WHERE display_name IS NOT NULL")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut names = HashMap::new();
        for row in rows {
            let (jid, name) = row?;
            names.insert(jid, name);
        }
        Ok(Self { names })
    }

    /// Builds a book from in-memory pairs. Intended for tests and examples.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns `true` if the jid exists in the book.
    pub fn contains(&self, jid: &str) -> bool {
        self.names.contains_key(jid)
    }

    /// Returns the display name for a jid, if one is known.
    pub fn get(&self, jid: &str) -> Option<&str> {
        self.names.get(jid).map(String::as_str)
    }

    /// Returns the display name for a jid, falling back to the jid truncated
    /// at the first `@` when no name is known.
    pub fn display_name(&self, jid: &str) -> String {
        match self.names.get(jid) {
            Some(name) => name.clone(),
            None => jid.split('@').next().unwrap_or(jid).to_string(),
        }
    }

    /// Resolves a selector to exactly one jid.
    ///
    /// - [`TargetSelector::Id`] succeeds only if the jid exists in the book.
    /// - [`TargetSelector::Pattern`] is matched case-insensitively against
    ///   all display names. Zero matches and multiple matches are both
    ///   failures; the ambiguous case lists every candidate sorted by
    ///   display name.
    pub fn resolve(&self, selector: &TargetSelector) -> Result<String> {
        match selector {
            TargetSelector::Id(id) => {
                if self.names.contains_key(id) {
                    Ok(id.clone())
                } else {
                    Err(EmojistatError::ContactNotFound { id: id.clone() })
                }
            }
            TargetSelector::Pattern(pattern) => self.resolve_pattern(pattern),
        }
    }

    fn resolve_pattern(&self, pattern: &str) -> Result<String> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| EmojistatError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        let mut matches: Vec<(&String, &String)> = self
            .names
            .iter()
            .filter(|(_, name)| re.is_match(name))
            .collect();

        match matches.len() {
            0 => Err(EmojistatError::NoMatch {
                pattern: pattern.to_string(),
            }),
            1 => Ok(matches[0].0.clone()),
            _ => {
                matches.sort_by(|a, b| a.1.cmp(b.1));
                let candidates = matches
                    .iter()
                    .map(|(jid, name)| format!("{} (id = '{}')", strip_non_ascii(name), jid))
                    .collect();
                Err(EmojistatError::AmbiguousPattern {
                    pattern: pattern.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Injects the synthetic self contact (`me` → `Me`).
    ///
    /// Call this after [`resolve`](Self::resolve) so the entry does not
    /// participate in pattern matching.
    pub fn insert_self(&mut self) {
        self.names
            .insert(SELF_JID.to_string(), SELF_NAME.to_string());
    }
}

/// Drops every non-ASCII character from a string.
///
/// Display names often mix emoji and non-Latin scripts; diagnostics and the
/// report header use this to stay representable on any terminal.
pub fn strip_non_ascii(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> ContactBook {
        ContactBook::from_pairs([
            ("111@s.whatsapp.net", "Alice"),
            ("222@s.whatsapp.net", "Alina"),
            ("333@g.us", "Team Alpha"),
            ("444@s.whatsapp.net", "Bob"),
        ])
    }

    #[test]
    fn test_resolve_exact_id() {
        let book = sample_book();
        let jid = book
            .resolve(&TargetSelector::Id("444@s.whatsapp.net".to_string()))
            .unwrap();
        assert_eq!(jid, "444@s.whatsapp.net");
    }

    #[test]
    fn test_resolve_exact_id_not_found() {
        let book = sample_book();
        let err = book
            .resolve(&TargetSelector::Id("999@s.whatsapp.net".to_string()))
            .unwrap_err();
        assert!(matches!(err, EmojistatError::ContactNotFound { .. }));
    }

    #[test]
    fn test_resolve_pattern_unique() {
        let book = sample_book();
        let jid = book
            .resolve(&TargetSelector::Pattern("bob".to_string()))
            .unwrap();
        assert_eq!(jid, "444@s.whatsapp.net");
    }

    #[test]
    fn test_resolve_pattern_case_insensitive() {
        let book = sample_book();
        let jid = book
            .resolve(&TargetSelector::Pattern("TEAM".to_string()))
            .unwrap();
        assert_eq!(jid, "333@g.us");
    }

    #[test]
    fn test_resolve_pattern_no_match() {
        let book = sample_book();
        let err = book
            .resolve(&TargetSelector::Pattern("charlie".to_string()))
            .unwrap_err();
        assert!(matches!(err, EmojistatError::NoMatch { .. }));
    }

    #[test]
    fn test_resolve_pattern_ambiguous_sorted_by_name() {
        let book = sample_book();
        let err = book
            .resolve(&TargetSelector::Pattern("ali".to_string()))
            .unwrap_err();
        match err {
            EmojistatError::AmbiguousPattern { candidates, .. } => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates[0].starts_with("Alice"));
                assert!(candidates[1].starts_with("Alina"));
                assert!(candidates[0].contains("111@s.whatsapp.net"));
            }
            other => panic!("expected AmbiguousPattern, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_pattern_invalid_regex() {
        let book = sample_book();
        let err = book
            .resolve(&TargetSelector::Pattern("(unclosed".to_string()))
            .unwrap_err();
        assert!(matches!(err, EmojistatError::InvalidPattern { .. }));
    }

    #[test]
    fn test_self_not_matchable_before_insert() {
        let book = sample_book();
        let err = book
            .resolve(&TargetSelector::Pattern("^Me$".to_string()))
            .unwrap_err();
        assert!(matches!(err, EmojistatError::NoMatch { .. }));
    }

    #[test]
    fn test_insert_self() {
        let mut book = sample_book();
        assert!(!book.contains(SELF_JID));
        book.insert_self();
        assert_eq!(book.get(SELF_JID), Some(SELF_NAME));
    }

    #[test]
    fn test_display_name_fallback_truncates_at_at() {
        let book = sample_book();
        assert_eq!(book.display_name("555@s.whatsapp.net"), "555");
        assert_eq!(book.display_name("111@s.whatsapp.net"), "Alice");
    }

    #[test]
    fn test_strip_non_ascii() {
        assert_eq!(strip_non_ascii("Team Alpha"), "Team Alpha");
        assert_eq!(strip_non_ascii("Café ☕"), "Caf ");
        assert_eq!(strip_non_ascii("日本語"), "");
    }

    #[test]
    fn test_load_from_connection_skips_null_names() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE wa_contacts (jid TEXT, display_name TEXT);
             INSERT INTO wa_contacts VALUES ('a@s.whatsapp.net', 'Alice');
             INSERT INTO wa_contacts VALUES ('b@s.whatsapp.net', NULL);",
        )
        .unwrap();

        let book = ContactBook::from_connection(&conn).unwrap();
        assert!(book.contains("a@s.whatsapp.net"));
        assert!(!book.contains("b@s.whatsapp.net"));
    }
}
