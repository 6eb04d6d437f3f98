//! Language Reactor tab-delimited export.
//!
//! Saved items are exported one per line. Lines that carry a word start with
//! `WORD|lemma|lang`, followed by tab-separated positional fields. The
//! offsets below follow the "saved items" export of Language Reactor as of
//! its `WORD|`-prefixed layout; the export is not documented, so they are
//! observed positions rather than a published schema.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::entry::{Extraction, NormalizedEntry};
use crate::error::Result;

/// Prefix of every word record.
pub const RECORD_MARKER: &str = "WORD|";

/// Separator between positional fields.
pub const FIELD_DELIMITER: char = '\t';

/// Separator inside the record head (`WORD|lemma|lang`).
pub const HEAD_DELIMITER: char = '|';

/// Records with fewer fields are skipped.
pub const MIN_FIELDS: usize = 9;

/// `WORD|lemma|lang`.
pub const FIELD_HEAD: usize = 0;
/// Subtitle line in the studied language, quoted.
pub const FIELD_CONTEXT_SOURCE: usize = 2;
/// Machine translation of the subtitle line, quoted.
pub const FIELD_CONTEXT_TARGET: usize = 3;
/// Word as it appeared in the subtitle.
pub const FIELD_WORD_FORM: usize = 4;
/// Part-of-speech tag.
pub const FIELD_PART_OF_SPEECH: usize = 6;
/// Dictionary translation, quoted.
pub const FIELD_TRANSLATION: usize = 8;
/// Video reference such as `yt_dQw4w9WgXcQ` (the 16th field).
pub const FIELD_VIDEO: usize = 15;

/// Prefix of YouTube video references.
pub const VIDEO_PREFIX: &str = "yt_";

/// Parse a legacy export file.
pub fn parse_legacy_file(path: impl AsRef<Path>) -> Result<Extraction> {
    let file = std::fs::File::open(path)?;
    parse_legacy(file)
}

/// Parse a legacy export from any reader.
pub fn parse_legacy<R: Read>(reader: R) -> Result<Extraction> {
    let mut extraction = Extraction::default();

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let Some(record) = parse_record(line.trim()) else {
            continue;
        };

        if extraction.video_id.is_none() {
            extraction.video_id = record.video_id;
        }
        if let Some(entry) = record.entry {
            extraction.entries.push(entry);
        }
    }

    Ok(extraction)
}

/// A well-formed record: possibly an entry, possibly a video id.
struct Record {
    entry: Option<NormalizedEntry>,
    video_id: Option<String>,
}

/// Parse one trimmed line. `None` for lines that are not word records.
fn parse_record(line: &str) -> Option<Record> {
    if !line.starts_with(RECORD_MARKER) {
        return None;
    }

    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let mut head = fields[FIELD_HEAD].split(HEAD_DELIMITER);
    head.next();
    let lemma = head.next()?;

    let video_id = fields
        .get(FIELD_VIDEO)
        .and_then(|field| field.strip_prefix(VIDEO_PREFIX))
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    let field = |index: usize| fields.get(index).copied().unwrap_or_default();
    let entry = NormalizedEntry {
        lemma: lemma.to_string(),
        word_form: field(FIELD_WORD_FORM).to_string(),
        part_of_speech: field(FIELD_PART_OF_SPEECH).to_string(),
        translation: strip_quotes(field(FIELD_TRANSLATION)).to_string(),
        context_source_lang: strip_quotes(field(FIELD_CONTEXT_SOURCE)).to_string(),
        context_target_lang: strip_quotes(field(FIELD_CONTEXT_TARGET)).to_string(),
        is_multiword_chunk: false,
    };

    let keep = !entry.lemma.is_empty()
        && (!entry.translation.is_empty() || !entry.context_source_lang.is_empty());

    Some(Record {
        entry: keep.then_some(entry),
        video_id,
    })
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches('"')
}
