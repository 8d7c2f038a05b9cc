//! # emojistat CLI
//!
//! Thin binary over the emojistat library: parses arguments, runs the
//! pipeline, and streams the HTML report to stdout (or `--output`). All
//! progress and diagnostics go to stderr so the document stays clean.

use std::fs::File;
use std::io::{self, BufWriter};
use std::process;

use clap::Parser as ClapParser;

use emojistat::attribution::aggregate;
use emojistat::catalog::EmojiCatalog;
use emojistat::cli::Args;
use emojistat::contacts::{ContactBook, TargetSelector};
use emojistat::report;
use emojistat::store::MessageStore;
use emojistat::tally::tally;
use emojistat::{EmojistatError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = <Args as ClapParser>::parse();

    for db in [&args.msg_db, &args.contacts_db] {
        if !db.is_file() {
            return Err(EmojistatError::DatabaseNotFound { path: db.clone() });
        }
    }

    // Stage 1: resolve the target
    let mut contacts = ContactBook::load(&args.contacts_db)?;
    let selector = args.selector();
    let target = contacts.resolve(&selector)?;
    if let TargetSelector::Pattern(pattern) = &selector {
        eprintln!(
            "Found exactly one match for the pattern '{}': '{}' (id = '{}'). \
             Will generate statistics for it",
            pattern,
            emojistat::contacts::strip_non_ascii(&contacts.display_name(&target)),
            target
        );
    }
    contacts.insert_self();

    // Stage 2: load messages
    let store = MessageStore::open(&args.msg_db)?;
    let rows = store.messages_for(&target)?;
    eprintln!("Loaded {} messages for '{}'", rows.len(), target);

    // Stage 3: attribute senders
    let aggregates = aggregate(&rows, &target)?;
    eprintln!("Attributed messages to {} senders", aggregates.len());

    // Stage 4: tally
    let catalog = EmojiCatalog::load(&args.emoji_catalog)?;
    let matrix = tally(&catalog, &aggregates)?;

    // Stage 5: render. Nothing is written until every prior stage succeeded,
    // so a failed run never leaves a partial document on stdout.
    match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            report::render(&mut out, &target, &contacts, &aggregates, &catalog, &matrix)?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            report::render(&mut out, &target, &contacts, &aggregates, &catalog, &matrix)?;
        }
    }

    eprintln!("Done!");
    Ok(())
}
