//! Error types for vocab-prep.
//!
//! Only [`Error::MissingInput`] and IO failures on the output file stop the
//! preprocessing run. Transcript errors are meant to be logged and skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for vocab-prep operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preprocessing an export.
#[derive(Debug, Error)]
pub enum Error {
    /// The export file does not exist.
    #[error("{} not found", .0.display())]
    MissingInput(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTTP/network error while fetching a transcript.
    #[cfg(feature = "transcript")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected JSON from the player endpoint.
    #[cfg(feature = "transcript")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed timed-text XML.
    #[cfg(feature = "transcript")]
    #[error("transcript XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The uploader disabled subtitles for the video.
    #[cfg(feature = "transcript")]
    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    /// The video does not exist or cannot be played.
    #[cfg(feature = "transcript")]
    #[error("video {video_id} is unavailable: {reason}")]
    VideoUnavailable {
        /// Video id.
        video_id: String,
        /// Reason given by YouTube.
        reason: String,
    },

    /// Neither a manual nor a generated transcript exists in the language.
    #[cfg(feature = "transcript")]
    #[error("no transcript found for video {video_id} in language '{lang}'")]
    NoTranscriptFound {
        /// Video id.
        video_id: String,
        /// Requested language code.
        lang: String,
    },

    /// YouTube answered with a captcha page.
    #[cfg(feature = "transcript")]
    #[error("too many requests; YouTube is asking for a captcha")]
    TooManyRequests,
}
