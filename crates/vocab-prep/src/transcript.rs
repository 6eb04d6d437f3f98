//! YouTube transcript retrieval.
//!
//! The watch page provides an InnerTube API key, the player endpoint lists
//! the caption tracks, and each track's `baseUrl` serves timed-text XML.
//!
//! # Example
//!
//! ```no_run
//! use vocab_prep::TranscriptClient;
//!
//! # async fn example() -> vocab_prep::Result<()> {
//! let client = TranscriptClient::new()?;
//! let transcript = client.fetch("dQw4w9WgXcQ", "ru").await?;
//! println!("{}", transcript.text());
//! # Ok(())
//! # }
//! ```

use std::sync::LazyLock;
use std::time::Duration;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex_lite::Regex;
use reqwest::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Default YouTube origin.
const DEFAULT_URL: &str = "https://www.youtube.com";

/// Default timeout for each request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// InnerTube client identity sent to the player endpoint.
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static API_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid API key pattern")
});

/// A caption track advertised by the player endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Timed-text URL.
    pub base_url: String,
    /// Language code such as `ru`.
    pub language_code: String,
    /// Automatic speech recognition track rather than uploaded subtitles.
    pub is_generated: bool,
}

/// One timed line of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Caption text.
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// A fetched transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Video id.
    pub video_id: String,
    /// Language of the track.
    pub language_code: String,
    /// Whether the track was auto-generated.
    pub is_generated: bool,
    /// Segments in playback order.
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// All segment texts joined by newlines.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl From<RawCaptionTrack> for CaptionTrack {
    fn from(raw: RawCaptionTrack) -> Self {
        Self {
            base_url: raw.base_url.replace("&fmt=srv3", ""),
            language_code: raw.language_code,
            is_generated: raw.kind.as_deref() == Some("asr"),
        }
    }
}

/// Client for fetching YouTube transcripts.
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    http_client: Client,
    base_url: String,
}

impl TranscriptClient {
    /// Create a client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> TranscriptClientBuilder {
        TranscriptClientBuilder::new()
    }

    /// Fetch the transcript of `video_id` in `lang`.
    ///
    /// Uploaded subtitles are preferred; auto-generated ones are the fallback.
    pub async fn fetch(&self, video_id: &str, lang: &str) -> Result<Transcript> {
        let tracks = self.list(video_id).await?;
        let track = select_track(&tracks, lang).ok_or_else(|| Error::NoTranscriptFound {
            video_id: video_id.to_string(),
            lang: lang.to_string(),
        })?;

        info!(
            video_id,
            lang,
            generated = track.is_generated,
            "fetching transcript"
        );

        let xml = self
            .http_client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            segments: parse_timedtext(&xml)?,
        })
    }

    /// List the caption tracks of a video.
    pub async fn list(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let api_key = self.innertube_api_key(video_id).await?;

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let response: PlayerResponse = self
            .http_client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(status) = response.playability_status {
            if status.status != "OK" {
                return Err(Error::VideoUnavailable {
                    video_id: video_id.to_string(),
                    reason: status.reason.unwrap_or(status.status),
                });
            }
        }

        let tracks: Vec<CaptionTrack> = response
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|r| r.caption_tracks)
            .unwrap_or_default()
            .into_iter()
            .map(CaptionTrack::from)
            .collect();

        if tracks.is_empty() {
            return Err(Error::TranscriptsDisabled(video_id.to_string()));
        }

        debug!(video_id, tracks = tracks.len(), "listed caption tracks");
        Ok(tracks)
    }

    /// Scrape the InnerTube API key from the watch page.
    async fn innertube_api_key(&self, video_id: &str) -> Result<String> {
        let html = self
            .http_client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        if let Some(captures) = API_KEY_PATTERN.captures(&html) {
            return Ok(captures[1].to_string());
        }

        if html.contains("class=\"g-recaptcha\"") {
            return Err(Error::TooManyRequests);
        }

        Err(Error::VideoUnavailable {
            video_id: video_id.to_string(),
            reason: "watch page has no player data".to_string(),
        })
    }
}

/// Builder for creating a customized [`TranscriptClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use vocab_prep::TranscriptClient;
///
/// # fn main() -> vocab_prep::Result<()> {
/// let client = TranscriptClient::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TranscriptClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: Option<String>,
}

impl TranscriptClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the YouTube origin. Defaults to `https://www.youtube.com`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Set the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TranscriptClient> {
        let mut builder = Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        Ok(TranscriptClient {
            http_client: builder.build()?,
            base_url: self.base_url,
        })
    }
}

impl Default for TranscriptClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the uploaded track for `lang`, else the generated one.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let in_lang = |generated: bool| {
        tracks
            .iter()
            .find(|t| t.language_code == lang && t.is_generated == generated)
    };
    in_lang(false).or_else(|| in_lang(true))
}

/// Parse timed-text XML into segments.
///
/// Empty `<text>` elements are dropped.
pub fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptSegment>> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<TranscriptSegment> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"text" => {
                let mut segment = TranscriptSegment {
                    text: String::new(),
                    start: 0.0,
                    duration: 0.0,
                };
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let value = attr.unescape_value()?;
                    match attr.key.as_ref() {
                        b"start" => segment.start = value.parse().unwrap_or_default(),
                        b"dur" => segment.duration = value.parse().unwrap_or_default(),
                        _ => {}
                    }
                }
                current = Some(segment);
            }
            Event::Text(t) => {
                if let Some(segment) = current.as_mut() {
                    segment.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) if e.name().as_ref() == b"text" => {
                if let Some(mut segment) = current.take() {
                    segment.text = unescape_entities(segment.text);
                    if !segment.text.trim().is_empty() {
                        segments.push(segment);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(segments)
}

/// Longest entity reference decoded by [`unescape_entities`].
const MAX_ENTITY_LEN: usize = 10;

/// Decode the entities YouTube escapes a second time inside `<text>`
/// (`&amp;#39;` reads as `&#39;` after XML parsing). A bare `&` or an
/// unknown entity is kept as is.
fn unescape_entities(text: String) -> String {
    if !text.contains('&') {
        return text;
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let entity = rest
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .map(|end| &rest[..=end]);
        match entity.map(|e| (e, quick_xml::escape::unescape(e))) {
            Some((e, Ok(value))) => {
                decoded.push_str(&value);
                rest = &rest[e.len()..];
            }
            _ => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}
