//! Command-line interface definition using clap.
//!
//! Exactly one of `--name-pattern` / `--contact-id` must be given; clap
//! enforces the mutually exclusive, required group. Database and catalog
//! paths default to the conventional file names next to the working
//! directory.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::contacts::TargetSelector;

/// Create a histogram of emoji usage for any WhatsApp contact or group.
///
/// The report is a self-contained HTML document written to stdout (or to
/// `--output`); progress and diagnostics go to stderr.
#[derive(Parser, Debug, Clone)]
#[command(name = "emojistat")]
#[command(version, about, long_about = None)]
#[command(group(
    ArgGroup::new("selector")
        .required(true)
        .args(["name_pattern", "contact_id"])
))]
#[command(after_help = "EXAMPLES:
    emojistat -r 'team alpha' > report.html
    emojistat -r bob -m backup/msgstore.db -c backup/wa.db
    emojistat -i 123456789@g.us -o report.html")]
pub struct Args {
    /// Path to the message database
    #[arg(short = 'm', long, value_name = "path", default_value = "msgstore.db")]
    pub msg_db: PathBuf,

    /// Path to the contacts database
    #[arg(short = 'c', long, value_name = "path", default_value = "wa.db")]
    pub contacts_db: PathBuf,

    /// Path to the emoji catalog (JSON mapping emoji to base64 PNG)
    #[arg(
        short = 'e',
        long,
        value_name = "path",
        default_value = "all_emojis_base64.json"
    )]
    pub emoji_catalog: PathBuf,

    /// Case-insensitive regular expression matching the target contact or
    /// group name
    #[arg(short = 'r', long, value_name = "regexp")]
    pub name_pattern: Option<String>,

    /// Exact id of the target contact or group (case sensitive). Useful when
    /// two contacts share the same name and a pattern cannot distinguish them
    #[arg(short = 'i', long, value_name = "id")]
    pub contact_id: Option<String>,

    /// Write the HTML report here instead of stdout
    #[arg(short = 'o', long, value_name = "path")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Builds the target selector from whichever selector argument was given.
    ///
    /// clap guarantees exactly one of the two is present.
    pub fn selector(&self) -> TargetSelector {
        if let Some(id) = &self.contact_id {
            TargetSelector::Id(id.clone())
        } else {
            TargetSelector::Pattern(
                self.name_pattern
                    .clone()
                    .unwrap_or_default(),
            )
        }
    }
}
