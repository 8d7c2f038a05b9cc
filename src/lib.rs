//! # emojistat
//!
//! A Rust library and CLI for generating sortable HTML reports of emoji
//! usage for any WhatsApp contact or group, straight from a local message
//! store backup.
//!
//! ## Overview
//!
//! The pipeline runs strictly forward through five stages:
//!
//! 1. [`contacts`] — load the contacts database and resolve the target
//!    contact or group from an exact id or a name pattern
//! 2. [`store`] — load all non-media message rows for the resolved target
//! 3. [`attribution`] — classify each message to a logical sender and
//!    concatenate per-sender text blobs
//! 4. [`tally`] — count occurrences of every catalog emoji per sender
//! 5. [`report`] — render the sortable HTML table
//!
//! Each stage completes before the next begins; all inputs are opened
//! read-only and every error is terminal for the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::io;
//! use std::path::Path;
//!
//! use emojistat::prelude::*;
//!
//! fn main() -> emojistat::Result<()> {
//!     let mut contacts = ContactBook::load(Path::new("wa.db"))?;
//!     let target = contacts.resolve(&TargetSelector::Pattern("team alpha".into()))?;
//!     contacts.insert_self();
//!
//!     let store = MessageStore::open(Path::new("msgstore.db"))?;
//!     let rows = store.messages_for(&target)?;
//!     let aggregates = aggregate(&rows, &target)?;
//!
//!     let catalog = EmojiCatalog::load(Path::new("all_emojis_base64.json"))?;
//!     let matrix = tally(&catalog, &aggregates)?;
//!
//!     report::render(
//!         &mut io::stdout().lock(),
//!         &target,
//!         &contacts,
//!         &aggregates,
//!         &catalog,
//!         &matrix,
//!     )
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`contacts`] — [`ContactBook`](contacts::ContactBook),
//!   [`TargetSelector`](contacts::TargetSelector)
//! - [`store`] — [`MessageStore`](store::MessageStore),
//!   [`MessageRow`](store::MessageRow)
//! - [`attribution`] — [`aggregate`](attribution::aggregate),
//!   [`SenderAggregates`](attribution::SenderAggregates)
//! - [`catalog`] — [`EmojiCatalog`](catalog::EmojiCatalog)
//! - [`tally`] — [`tally`](tally::tally), [`TallyMatrix`](tally::TallyMatrix)
//! - [`report`] — [`render`](report::render)
//! - [`cli`] — CLI argument surface ([`Args`](cli::Args))
//! - [`error`] — unified error type ([`EmojistatError`], [`Result`])

pub mod attribution;
pub mod catalog;
pub mod cli;
pub mod contacts;
pub mod error;
pub mod report;
pub mod store;
pub mod tally;

// Re-export the main types at the crate root for convenience
pub use error::{EmojistatError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use emojistat::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{EmojistatError, Result};

    // Pipeline stages, in order
    pub use crate::contacts::{ContactBook, TargetSelector};
    pub use crate::store::{MessageRow, MessageStore};
    pub use crate::attribution::{SenderAggregates, aggregate};
    pub use crate::catalog::EmojiCatalog;
    pub use crate::tally::{TallyMatrix, tally};
    pub use crate::report;
}
