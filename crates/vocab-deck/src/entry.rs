//! Vocabulary CSV parsing.
//!
//! Input files have no header row. Columns are positional:
//!
//! | column | content |
//! |---|---|
//! | 0 | key term (required) |
//! | 1 | translation |
//! | 2 | example sentence |
//! | 3 | example translation |
//! | 4 | space-separated tags |
//!
//! Rows with fewer than two columns or an empty key term are dropped.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::Result;

const KEY_TERM: usize = 0;
const TRANSLATION: usize = 1;
const EXAMPLE: usize = 2;
const EXAMPLE_TRANSLATION: usize = 3;
const TAGS: usize = 4;

/// Minimum number of columns for a row to be considered.
const MIN_COLUMNS: usize = 2;

/// One vocabulary item read from a CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    /// Dictionary form of the word, used as the dedup and GUID key.
    pub key_term: String,
    /// Translation shown on the other side of the card.
    pub translation: String,
    /// Example sentence in the studied language.
    pub example: String,
    /// Translation of the example sentence.
    pub example_translation: String,
    /// Anki tags.
    pub tags: Vec<String>,
}

impl VocabEntry {
    /// Build an entry from a CSV record.
    ///
    /// Returns `None` for rows that are too short or have an empty key term.
    pub fn from_record(record: &StringRecord) -> Option<Self> {
        if record.len() < MIN_COLUMNS {
            return None;
        }

        let cell = |index: usize| record.get(index).map(str::trim).unwrap_or_default();

        let key_term = cell(KEY_TERM);
        if key_term.is_empty() {
            return None;
        }

        Some(Self {
            key_term: key_term.to_string(),
            translation: cell(TRANSLATION).to_string(),
            example: cell(EXAMPLE).to_string(),
            example_translation: cell(EXAMPLE_TRANSLATION).to_string(),
            tags: cell(TAGS).split_whitespace().map(String::from).collect(),
        })
    }
}

/// Read all entries from a vocabulary CSV file.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<VocabEntry>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let entries = read_entries(file)?;
    debug!(path = %path.display(), count = entries.len(), "read vocabulary file");
    Ok(entries)
}

/// Read entries from any CSV source.
///
/// Rows that cannot be decoded are skipped like other malformed rows.
/// IO failures are returned.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<VocabEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!(error = %e, "skipping undecodable row");
                dropped += 1;
                continue;
            }
        };

        match VocabEntry::from_record(&record) {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped malformed rows");
    }

    Ok(entries)
}
