//! Preprocess vocabulary exports from YouTube subtitle extensions.
//!
//! Two export formats are understood:
//!
//! - the simple CSV export (`word,sentence,timestamp,videoTitle,videoId`)
//! - the Language Reactor tab-delimited export (`WORD|lemma|lang` records)
//!
//! Both are normalized into [`NormalizedEntry`] rows and written as one CSV
//! layout. When the export names a YouTube video, its transcript can be
//! fetched with [`TranscriptClient`].
//!
//! # Features
//!
//! - `transcript` (default): Enable transcript fetching
//!
//! # Example
//!
//! ```no_run
//! use vocab_prep::{parse_export, write_preprocessed_csv};
//!
//! # fn main() -> vocab_prep::Result<()> {
//! let (format, extraction) = parse_export("export.csv")?;
//! println!("Detected format: {}", format);
//! write_preprocessed_csv("preprocessed.csv", &extraction.entries)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod format;
pub mod legacy;
pub mod simple;

#[cfg(feature = "transcript")]
pub mod transcript;

use std::path::Path;

use tracing::debug;

pub use entry::{
    Extraction, NormalizedEntry, OUTPUT_HEADER, transcript_path, write_entries,
    write_preprocessed_csv,
};
pub use error::{Error, Result};
pub use format::{ExportFormat, detect_format, detect_format_str};
pub use legacy::{parse_legacy, parse_legacy_file};
pub use simple::{parse_simple, parse_simple_file};

#[cfg(feature = "transcript")]
pub use transcript::{
    CaptionTrack, Transcript, TranscriptClient, TranscriptClientBuilder, TranscriptSegment,
};

/// Detect an export's format and extract its entries.
pub fn parse_export(path: impl AsRef<Path>) -> Result<(ExportFormat, Extraction)> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingInput(path.to_path_buf()));
    }

    let format = detect_format(path)?;
    let extraction = parse_with_format(path, format)?;
    debug!(
        path = %path.display(),
        format = %format,
        entries = extraction.entries.len(),
        "parsed export"
    );
    Ok((format, extraction))
}

/// Extract entries with a known format.
pub fn parse_with_format(path: impl AsRef<Path>, format: ExportFormat) -> Result<Extraction> {
    match format {
        ExportFormat::Simple => parse_simple_file(path),
        ExportFormat::LegacyTabDelimited => parse_legacy_file(path),
    }
}
