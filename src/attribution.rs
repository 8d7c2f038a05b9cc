//! Sender attribution and per-sender text aggregation.
//!
//! Each loaded message is classified to a logical sender id and its text is
//! appended to that sender's running blob. The classification rules differ
//! for group chats, one-to-one chats, and broadcast lists; every branch
//! carries a consistency assertion, and a violated assertion is fatal — it
//! means the message store holds data in a shape this tool does not
//! understand, not a recoverable condition.
//!
//! Accumulation order is irrelevant to the final counts: tallying is a pure
//! content scan over each blob.

use std::collections::HashMap;

use crate::contacts::SELF_JID;
use crate::error::{EmojistatError, Result};
use crate::store::MessageRow;

/// Status code marking a broadcast-list system event.
pub const STATUS_BROADCAST: i64 = 5;

/// Status code marking a group-name-change system event.
pub const STATUS_GROUP_NAME_CHANGE: i64 = 6;

/// Jid marker substring for one-to-one chats.
pub const ONE_TO_ONE_MARKER: &str = "@s.";

/// Jid marker substring for group chats.
pub const GROUP_MARKER: &str = "@g.";

/// Jid suffix for broadcast recipients.
pub const BROADCAST_SUFFIX: &str = "@broadcast";

/// Per-sender concatenated message text, in first-seen sender order.
///
/// Iteration order defines the report's column order, so it is kept stable:
/// senders appear in the order their first message was encountered.
#[derive(Debug, Default, Clone)]
pub struct SenderAggregates {
    order: Vec<String>,
    blobs: HashMap<String, String>,
}

impl SenderAggregates {
    /// Creates an empty aggregate map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text` to `sender`'s blob, separated from any prior content
    /// by a single space.
    pub fn append(&mut self, sender: &str, text: &str) {
        match self.blobs.get_mut(sender) {
            Some(blob) => {
                blob.push(' ');
                blob.push_str(text);
            }
            None => {
                self.order.push(sender.to_string());
                self.blobs.insert(sender.to_string(), text.to_string());
            }
        }
    }

    /// Iterates senders in first-seen order.
    pub fn senders(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns a sender's blob, if that sender has any messages.
    pub fn blob(&self, sender: &str) -> Option<&str> {
        self.blobs.get(sender).map(String::as_str)
    }

    /// Number of distinct senders.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no message has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Classifies one message row to its logical sender id.
///
/// Decision order:
/// 1. Self-authored → [`SELF_JID`]. The `sender_resource` field must be
///    empty, except for broadcast and group-name-change system events
///    (status codes [`STATUS_BROADCAST`] and [`STATUS_GROUP_NAME_CHANGE`]).
/// 2. `sender_resource` is the empty string → the target must be a
///    one-to-one chat; the sender is the conversation jid itself.
/// 3. The target is not a group chat → the `sender_resource` must be a
///    broadcast recipient; the sender is the conversation jid.
/// 4. Otherwise the target must be a group chat; the sender is the
///    `sender_resource` value.
pub fn attribute_sender(row: &MessageRow, target: &str) -> Result<String> {
    if row.from_me {
        let status_exempt =
            row.status == STATUS_BROADCAST || row.status == STATUS_GROUP_NAME_CHANGE;
        if !status_exempt && !row.sender_resource.as_deref().unwrap_or("").is_empty() {
            return Err(EmojistatError::consistency(format!(
                "self-sent message carries a sender resource: {row:?}"
            )));
        }
        return Ok(SELF_JID.to_string());
    }

    if row.sender_resource.as_deref() == Some("") {
        if !target.contains(ONE_TO_ONE_MARKER) {
            return Err(EmojistatError::consistency(format!(
                "empty sender resource outside a one-to-one chat: {row:?}"
            )));
        }
        return Ok(row.chat_jid.clone());
    }

    if !target.contains(GROUP_MARKER) {
        let is_broadcast = row
            .sender_resource
            .as_deref()
            .is_some_and(|r| r.ends_with(BROADCAST_SUFFIX));
        if !is_broadcast {
            return Err(EmojistatError::consistency(format!(
                "non-group, non-broadcast message with a sender resource: {row:?}"
            )));
        }
        return Ok(row.chat_jid.clone());
    }

    match row.sender_resource.as_deref() {
        Some(resource) => Ok(resource.to_string()),
        None => Err(EmojistatError::consistency(format!(
            "group message without a sender resource: {row:?}"
        ))),
    }
}

/// Attributes every row with non-NULL text and accumulates the blobs.
///
/// Rows with NULL text (e.g. deleted messages) are skipped entirely,
/// including their consistency assertions, mirroring the store's notion of
/// "no textual payload".
pub fn aggregate(rows: &[MessageRow], target: &str) -> Result<SenderAggregates> {
    let mut aggregates = SenderAggregates::new();
    for row in rows {
        let Some(text) = row.text.as_deref() else {
            continue;
        };
        let sender = attribute_sender(row, target)?;
        aggregates.append(&sender, text);
    }
    Ok(aggregates)
}
