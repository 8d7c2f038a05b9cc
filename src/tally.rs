//! Counting emoji occurrences per sender.
//!
//! A single alternation pattern is compiled over the whole catalog and each
//! sender's blob is scanned left to right for non-overlapping matches. The
//! alternation branches are ordered longest-first: the regex engine's
//! alternation is leftmost-first, so without that ordering a multi-codepoint
//! sequence (say a skin-tone variant) would be shadowed by a shorter prefix
//! that happens to also be a catalog entry.

use std::collections::{BTreeMap, HashMap};

use regex::Regex;

use crate::attribution::SenderAggregates;
use crate::catalog::EmojiCatalog;
use crate::error::{EmojistatError, Result};

/// Emoji → sender → occurrence count.
///
/// Every (catalog emoji, known sender) pair has an entry, zero-initialized,
/// so absent combinations are reportable as zero. Outer keys are always
/// catalog members.
#[derive(Debug, Clone)]
pub struct TallyMatrix {
    counts: BTreeMap<String, HashMap<String, u64>>,
}

impl TallyMatrix {
    fn zeroed(catalog: &EmojiCatalog, aggregates: &SenderAggregates) -> Self {
        let counts = catalog
            .emojis()
            .map(|emoji| {
                let senders = aggregates
                    .senders()
                    .map(|s| (s.to_string(), 0u64))
                    .collect();
                (emoji.to_string(), senders)
            })
            .collect();
        Self { counts }
    }

    /// Returns the count for an (emoji, sender) pair. Unknown pairs are zero.
    pub fn get(&self, emoji: &str, sender: &str) -> u64 {
        self.counts
            .get(emoji)
            .and_then(|senders| senders.get(sender))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of an emoji's counts over all senders.
    pub fn total(&self, emoji: &str) -> u64 {
        self.counts
            .get(emoji)
            .map(|senders| senders.values().sum())
            .unwrap_or(0)
    }

    /// Emojis with a nonzero total, sorted descending by total.
    ///
    /// Zero-total entries are filtered out explicitly rather than relying on
    /// an early stop over a sorted list; the sort is stable, so equal totals
    /// keep their catalog order.
    pub fn ranked_rows(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self
            .counts
            .keys()
            .map(|emoji| (emoji.as_str(), self.total(emoji)))
            .filter(|(_, total)| *total > 0)
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows
    }

    /// Iterates all catalog emojis present in the matrix.
    pub fn emojis(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

/// Compiles the catch-all alternation over every catalog emoji.
///
/// Each branch is escaped (emoji sequences can contain regex metacharacters
/// such as `*` in keycap sequences) and branches are sorted longest-first.
pub fn build_matcher(catalog: &EmojiCatalog) -> Result<Regex> {
    if catalog.is_empty() {
        return Err(EmojistatError::EmptyCatalog);
    }

    let mut branches: Vec<&str> = catalog.emojis().collect();
    branches.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = branches
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");

    // The escaped alternation over a non-empty catalog always compiles; a
    // failure here means a regex-crate limit (e.g. compiled size) was hit.
    Regex::new(&pattern).map_err(|source| EmojistatError::InvalidPattern {
        pattern: "<emoji catalog alternation>".to_string(),
        source,
    })
}

/// Scans every sender's blob and produces the full tally matrix.
///
/// Matching is non-overlapping and left to right; each match increments the
/// (matched emoji, sender) count by one. Re-running over the same inputs is
/// idempotent.
pub fn tally(catalog: &EmojiCatalog, aggregates: &SenderAggregates) -> Result<TallyMatrix> {
    let matcher = build_matcher(catalog)?;
    let mut matrix = TallyMatrix::zeroed(catalog, aggregates);

    for sender in aggregates.senders() {
        let Some(blob) = aggregates.blob(sender) else {
            continue;
        };
        for found in matcher.find_iter(blob) {
            if let Some(senders) = matrix.counts.get_mut(found.as_str()) {
                *senders.entry(sender.to_string()).or_insert(0) += 1;
            }
        }
    }

    Ok(matrix)
}
