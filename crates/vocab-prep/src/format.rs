//! Export format detection.
//!
//! Detection is a heuristic on a few markers, not a grammar. A file that
//! matches neither marker is treated as [`ExportFormat::Simple`].

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::legacy::RECORD_MARKER;

/// First-line prefix of the simple CSV export header.
pub const SIMPLE_HEADER_PREFIX: &str = "word,";

/// How many characters are scanned for the legacy marker.
pub const SNIFF_CHARS: usize = 1000;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// `word,sentence,timestamp,videoTitle,videoId` CSV.
    Simple,
    /// Language Reactor tab-delimited export with `WORD|` records.
    LegacyTabDelimited,
}

impl ExportFormat {
    /// Short name printed to the user.
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Simple => "simple",
            ExportFormat::LegacyTabDelimited => "language_reactor",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the format of an export file.
pub fn detect_format(path: impl AsRef<Path>) -> Result<ExportFormat> {
    let content = std::fs::read_to_string(path)?;
    Ok(detect_format_str(&content))
}

/// Detect the format from the start of an export's text.
pub fn detect_format_str(content: &str) -> ExportFormat {
    let first_line = content.lines().next().unwrap_or_default().trim();

    if first_line.starts_with(SIMPLE_HEADER_PREFIX) {
        return ExportFormat::Simple;
    }
    if first_line.contains(RECORD_MARKER) {
        return ExportFormat::LegacyTabDelimited;
    }

    let head: String = content.chars().take(SNIFF_CHARS).collect();
    if head.contains(RECORD_MARKER) {
        return ExportFormat::LegacyTabDelimited;
    }

    warn!("no format marker found; assuming simple export");
    ExportFormat::Simple
}
