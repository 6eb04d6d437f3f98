//! Simple CSV export: `word,sentence,timestamp,videoTitle,videoId`.
//!
//! This format has no translations and no target-language context.
//! Multi-word selections are flagged as chunks.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::entry::{Extraction, NormalizedEntry};
use crate::error::Result;

const WORD_COLUMN: &str = "word";
const SENTENCE_COLUMN: &str = "sentence";
const VIDEO_ID_COLUMN: &str = "videoId";

/// Parse a simple export file.
pub fn parse_simple_file(path: impl AsRef<Path>) -> Result<Extraction> {
    let file = std::fs::File::open(path)?;
    parse_simple(file)
}

/// Parse a simple export from any reader.
pub fn parse_simple<R: Read>(reader: R) -> Result<Extraction> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let word_col = column(WORD_COLUMN);
    let sentence_col = column(SENTENCE_COLUMN);
    let video_col = column(VIDEO_ID_COLUMN);

    let mut extraction = Extraction::default();

    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!(row, error = %e, "skipping undecodable row");
                continue;
            }
        };

        let video_id = cell(&record, video_col);
        if extraction.video_id.is_none() && !video_id.is_empty() {
            extraction.video_id = Some(video_id.to_string());
        }

        let word = cell(&record, word_col);
        if word.is_empty() {
            continue;
        }

        extraction.entries.push(NormalizedEntry {
            lemma: word.to_string(),
            word_form: word.to_string(),
            part_of_speech: String::new(),
            translation: String::new(),
            context_source_lang: cell(&record, sentence_col).to_string(),
            context_target_lang: String::new(),
            is_multiword_chunk: word.contains(char::is_whitespace),
        });
    }

    Ok(extraction)
}

fn cell(record: &StringRecord, index: Option<usize>) -> &str {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .unwrap_or_default()
}
