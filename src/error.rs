//! Unified error types for emojistat.
//!
//! This module provides a single [`EmojistatError`] enum that covers all error
//! cases in the library, from configuration problems to data-integrity
//! violations inside the message store.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Every error is terminal for a run: the pipeline never retries, and no
//! partial report is emitted once an error is raised.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for emojistat operations.
pub type Result<T> = std::result::Result<T, EmojistatError>;

/// The error type for all emojistat operations.
///
/// Each variant contains context about what went wrong and, where applicable,
/// the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmojistatError {
    /// An I/O error occurred (reading the catalog, writing the report).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// An error from the SQLite layer (opening a database, running a query).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A configured database path does not point to a file.
    #[error("database not found: {}", path.display())]
    DatabaseNotFound {
        /// The path that was configured
        path: PathBuf,
    },

    /// The emoji catalog file could not be read.
    #[error("failed to read emoji catalog {}: {source}", path.display())]
    CatalogRead {
        /// Path to the catalog file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The emoji catalog file is not valid JSON.
    #[error("failed to parse emoji catalog {}: {source}", path.display())]
    CatalogParse {
        /// Path to the catalog file
        path: PathBuf,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The emoji catalog contains no entries.
    ///
    /// An empty catalog would produce a degenerate match-nothing pattern,
    /// so it is rejected up front.
    #[error("emoji catalog is empty")]
    EmptyCatalog,

    /// The user-supplied name pattern is not a valid regular expression.
    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as typed by the user
        pattern: String,
        /// The underlying regex compilation error
        #[source]
        source: regex::Error,
    },

    /// An exact contact id was given but does not exist in the contacts db.
    #[error("invalid id '{id}' - does not exist in the contacts db")]
    ContactNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A name pattern matched no contact at all.
    #[error("no match found in the contacts db for the pattern '{pattern}'")]
    NoMatch {
        /// The pattern that failed to match
        pattern: String,
    },

    /// A name pattern matched more than one contact.
    ///
    /// Carries every matching contact (sorted by display name, rendered as
    /// `Name (id = '...')` with non-ASCII characters stripped) so the user
    /// can narrow the pattern or switch to an exact id.
    #[error(
        "too many matches for the pattern '{pattern}', please narrow it down \
         (or specify an exact id):\n{}",
        candidates.join("\n")
    )]
    AmbiguousPattern {
        /// The pattern that matched too broadly
        pattern: String,
        /// One pre-formatted line per matching contact
        candidates: Vec<String>,
    },

    /// The message store holds no rows for the resolved target.
    #[error("no message data found for '{jid}'\nSQL query:\n'{query}'\n(?1 = '{jid}')")]
    NoMessages {
        /// The resolved target jid
        jid: String,
        /// The SQL text of the failed query, for diagnostics
        query: String,
    },

    /// A loaded row violated an attribution invariant.
    ///
    /// This indicates corrupt or unexpected data in the message store, not
    /// a user-correctable condition.
    #[error("data consistency violation: {context}")]
    Consistency {
        /// Description of the violated invariant and the offending row
        context: String,
    },
}

impl EmojistatError {
    /// Convenience constructor for [`EmojistatError::Consistency`].
    pub fn consistency(context: impl Into<String>) -> Self {
        EmojistatError::Consistency {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_not_found_message() {
        let err = EmojistatError::ContactNotFound {
            id: "x@s.whatsapp.net".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("x@s.whatsapp.net"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_ambiguous_pattern_lists_candidates() {
        let err = EmojistatError::AmbiguousPattern {
            pattern: "al".to_string(),
            candidates: vec![
                "Alice (id = '111@s.whatsapp.net')".to_string(),
                "Alina (id = '222@s.whatsapp.net')".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Alice (id = '111@s.whatsapp.net')"));
        assert!(msg.contains("Alina (id = '222@s.whatsapp.net')"));
    }

    #[test]
    fn test_no_messages_includes_query_context() {
        let err = EmojistatError::NoMessages {
            jid: "a@g.us".to_string(),
            query: "SELECT ...".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a@g.us"));
        assert!(msg.contains("SELECT ..."));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err: EmojistatError = io_err.into();
        assert!(matches!(err, EmojistatError::Io(_)));
    }
}
