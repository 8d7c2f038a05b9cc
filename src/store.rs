//! Message store access.
//!
//! Loads all non-media message rows for a resolved target jid from the
//! message database (`msgstore.db`) into typed [`MessageRow`] values.
//! Rows are validated once here, at the loader boundary; later stages can
//! rely on the shape without re-checking.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{EmojistatError, Result};

/// The row query. Media messages (any row with a media MIME type or media
/// name) are excluded; only textual payloads are relevant to the tally.
pub const MESSAGES_QUERY: &str = "SELECT data, remote_resource, key_remote_jid, key_from_me, status \
     FROM messages \
     WHERE key_remote_jid = ?1 AND media_mime_type IS NULL AND media_name IS NULL";

/// One textual message row, as stored.
///
/// `text` may be NULL in the store (e.g. deleted messages); such rows are
/// loaded but skipped during attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    /// Raw text payload.
    pub text: Option<String>,
    /// Originating group member or broadcast recipient. Only meaningful in
    /// group and broadcast contexts; NULL for self-sent rows, empty string
    /// in one-to-one chats.
    pub sender_resource: Option<String>,
    /// The conversation this row belongs to. Always equals the queried
    /// target jid.
    pub chat_jid: String,
    /// Whether the message was authored by the local user.
    pub from_me: bool,
    /// Raw status code. Certain system events (broadcast, group name
    /// change) are distinguished by this value during attribution.
    pub status: i64,
}

/// Read-only handle on the message database.
pub struct MessageStore {
    conn: Connection,
}

impl MessageStore {
    /// Opens the message database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    /// Opens an in-memory store. Intended for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying connection.
    ///
    /// Tests use this to create fixture schemas.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads every non-media message row for `target`.
    ///
    /// Fails with [`EmojistatError::NoMessages`] when the store holds no
    /// rows for the target, and with [`EmojistatError::Consistency`] if a
    /// returned row carries a different conversation jid than the one
    /// queried (which would mean a corrupt store, since the query filters
    /// on that column).
    pub fn messages_for(&self, target: &str) -> Result<Vec<MessageRow>> {
        let mut stmt = self.conn.prepare(MESSAGES_QUERY)?;
        let mapped = stmt.query_map([target], |row| {
            Ok(MessageRow {
                text: row.get(0)?,
                sender_resource: row.get(1)?,
                chat_jid: row.get(2)?,
                from_me: row.get::<_, i64>(3)? == 1,
                status: row.get(4)?,
            })
        })?;

        let mut rows = Vec::new();
        for row in mapped {
            let row = row?;
            if row.chat_jid != target {
                return Err(EmojistatError::consistency(format!(
                    "queried messages for '{target}' but got a row for '{}': {row:?}",
                    row.chat_jid
                )));
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(EmojistatError::NoMessages {
                jid: target.to_string(),
                query: MESSAGES_QUERY.to_string(),
            });
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal msgstore schema covering the queried columns.
    const FIXTURE_SCHEMA: &str = "CREATE TABLE messages (
             data TEXT,
             remote_resource TEXT,
             key_remote_jid TEXT NOT NULL,
             key_from_me INTEGER NOT NULL,
             status INTEGER NOT NULL,
             media_mime_type TEXT,
             media_name TEXT
         )";

    fn fixture_store() -> MessageStore {
        let store = MessageStore::open_in_memory().unwrap();
        store.connection().execute_batch(FIXTURE_SCHEMA).unwrap();
        store
    }

    fn insert(
        store: &MessageStore,
        data: Option<&str>,
        remote_resource: Option<&str>,
        jid: &str,
        from_me: i64,
        status: i64,
        mime: Option<&str>,
    ) {
        store
            .connection()
            .execute(
                "INSERT INTO messages VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
                rusqlite::params![data, remote_resource, jid, from_me, status, mime],
            )
            .unwrap();
    }

    #[test]
    fn test_loads_text_rows_for_target() {
        let store = fixture_store();
        insert(&store, Some("hi"), Some(""), "a@s.whatsapp.net", 0, 0, None);
        insert(&store, Some("yo"), None, "a@s.whatsapp.net", 1, 0, None);
        insert(&store, Some("other chat"), Some(""), "b@s.whatsapp.net", 0, 0, None);

        let rows = store.messages_for("a@s.whatsapp.net").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.chat_jid == "a@s.whatsapp.net"));
        assert_eq!(rows[0].text.as_deref(), Some("hi"));
        assert!(!rows[0].from_me);
        assert!(rows[1].from_me);
    }

    #[test]
    fn test_media_rows_excluded() {
        let store = fixture_store();
        insert(&store, Some("text"), Some(""), "a@s.whatsapp.net", 0, 0, None);
        insert(
            &store,
            Some("photo caption"),
            Some(""),
            "a@s.whatsapp.net",
            0,
            0,
            Some("image/jpeg"),
        );

        let rows = store.messages_for("a@s.whatsapp.net").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_null_text_rows_still_loaded() {
        let store = fixture_store();
        insert(&store, None, Some(""), "a@s.whatsapp.net", 0, 0, None);

        let rows = store.messages_for("a@s.whatsapp.net").unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].text.is_none());
    }

    #[test]
    fn test_no_rows_is_an_error_with_query_context() {
        let store = fixture_store();
        let err = store.messages_for("nobody@s.whatsapp.net").unwrap_err();
        match err {
            EmojistatError::NoMessages { jid, query } => {
                assert_eq!(jid, "nobody@s.whatsapp.net");
                assert_eq!(query, MESSAGES_QUERY);
            }
            other => panic!("expected NoMessages, got {other:?}"),
        }
    }
}
