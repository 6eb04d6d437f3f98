//! Preprocess a vocabulary export from a YouTube subtitle extension.
//!
//! ```text
//! preprocess-export export.csv -o preprocessed.csv
//! preprocess-export export.csv --no-transcript
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use vocab_prep::{Extraction, parse_export, transcript_path, write_preprocessed_csv};

// ============================================================================
// CLI Arguments
// ============================================================================

/// Preprocess a vocabulary export into a normalized CSV.
#[derive(Parser, Debug)]
#[command(name = "preprocess-export")]
#[command(version, about, long_about = None)]
struct Args {
    /// Export file (simple CSV or Language Reactor tab-delimited)
    input_file: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "preprocessed.csv")]
    output: PathBuf,

    /// Skip fetching the YouTube transcript
    #[arg(long)]
    no_transcript: bool,

    /// Transcript language code
    #[arg(long, default_value = "ru")]
    #[cfg_attr(not(feature = "transcript"), allow(dead_code))]
    lang: String,

    /// YouTube base URL used for transcript requests
    #[arg(long, default_value = "https://www.youtube.com", hide = true)]
    #[cfg_attr(not(feature = "transcript"), allow(dead_code))]
    youtube_url: String,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> vocab_prep::Result<()> {
    let (format, extraction) = parse_export(&args.input_file)?;
    println!("Detected format: {}", format);
    println!("Parsing {}...", args.input_file.display());

    report_extraction(&extraction);

    write_preprocessed_csv(&args.output, &extraction.entries)?;
    println!("Wrote preprocessed data to {}", args.output.display());

    match extraction.video_id.as_deref() {
        Some(_) if args.no_transcript => {}
        Some(video_id) => {
            println!("\nFetching transcript from YouTube...");
            save_transcript(video_id, args).await;
        }
        None => println!("\nNo video ID found in export, skipping transcript fetch"),
    }

    print_next_steps(existing_transcript(&args.output).as_deref());
    Ok(())
}

/// The transcript sidecar for `output`, if one is on disk from this or an
/// earlier run.
fn existing_transcript(output: &Path) -> Option<PathBuf> {
    let path = transcript_path(output);
    path.exists().then_some(path)
}

fn report_extraction(extraction: &Extraction) {
    println!("Found {} word entries", extraction.entries.len());

    let chunks = extraction.chunk_count();
    if chunks > 0 {
        println!("  Including {} multi-word chunks (collocations)", chunks);
    }

    if let Some(ref video_id) = extraction.video_id {
        println!("Video ID: {}", video_id);
        println!("Video URL: https://www.youtube.com/watch?v={}", video_id);
    }
}

/// Fetch the transcript and write it next to the output CSV.
///
/// Every failure here is reported and swallowed; the CSV is already written.
#[cfg(feature = "transcript")]
async fn save_transcript(video_id: &str, args: &Args) {
    use tracing::warn;
    use vocab_prep::{Error, TranscriptClient};

    let result = match TranscriptClient::builder().url(&args.youtube_url).build() {
        Ok(client) => client.fetch(video_id, &args.lang).await,
        Err(e) => Err(e),
    };

    let text = match result {
        Ok(transcript) => transcript.text(),
        Err(Error::TranscriptsDisabled(id)) => {
            warn!("Transcripts are disabled for video {}", id);
            String::new()
        }
        Err(Error::VideoUnavailable { video_id, reason }) => {
            warn!(%reason, "Video {} is unavailable", video_id);
            String::new()
        }
        Err(e) => {
            warn!("Could not fetch transcript: {}", e);
            String::new()
        }
    };

    if text.is_empty() {
        println!("  Could not fetch transcript");
        return;
    }

    let path = transcript_path(&args.output);
    match std::fs::write(&path, text) {
        Ok(()) => println!("Wrote transcript to {}", path.display()),
        Err(e) => {
            warn!(path = %path.display(), "Could not write transcript: {}", e);
            println!("  Could not fetch transcript");
        }
    }
}

#[cfg(not(feature = "transcript"))]
async fn save_transcript(video_id: &str, args: &Args) {
    tracing::warn!(
        video_id,
        output = %transcript_path(&args.output).display(),
        "Transcript support is not available. Rebuild with: cargo install preprocess-export --features transcript"
    );
    println!("  Could not fetch transcript");
}

fn print_next_steps(transcript: Option<&Path>) {
    let rule = "=".repeat(60);
    println!("\n{}", rule);
    println!("Next step: clean up the preprocessed file.");
    println!();
    println!("Notes for cleanup:");
    println!("  - Chunks marked 'Is Chunk=yes' should be kept as collocations");
    println!("  - Convert chunks to nominative form if needed");
    println!("  - Add translations (not provided in simple CSV format)");
    if let Some(path) = transcript {
        println!("  - Transcript available at: {}", path.display());
    }
    println!("{}", rule);
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["preprocess-export", "export.csv"]).unwrap();
        assert_eq!(args.input_file, PathBuf::from("export.csv"));
        assert_eq!(args.output, PathBuf::from("preprocessed.csv"));
        assert_eq!(args.lang, "ru");
        assert!(!args.no_transcript);
    }

    #[test]
    fn test_options() {
        let args = Args::try_parse_from([
            "preprocess-export",
            "export.txt",
            "-o",
            "out.csv",
            "--no-transcript",
            "--lang",
            "uk",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.output, PathBuf::from("out.csv"));
        assert!(args.no_transcript);
        assert_eq!(args.lang, "uk");
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_requires_input_file() {
        assert!(Args::try_parse_from(["preprocess-export"]).is_err());
    }

    const SIMPLE_EXPORT: &str =
        "word,sentence,timestamp,videoTitle,videoId\nкот,Кот спит,1.0,Cats,vid\n";

    fn args_for(input: PathBuf, output: PathBuf) -> Args {
        Args {
            input_file: input,
            output,
            no_transcript: false,
            lang: "ru".to_string(),
            youtube_url: "http://127.0.0.1:9".to_string(),
            verbose: 0,
        }
    }

    #[tokio::test]
    async fn test_run_without_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, SIMPLE_EXPORT).unwrap();

        let args = Args {
            no_transcript: true,
            ..args_for(input, output.clone())
        };
        run(&args).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("Word,Translation,Context (RU),Context (EN),POS,Is Chunk"));
        assert!(written.contains("кот"));
        assert!(!transcript_path(&output).exists());
    }

    #[tokio::test]
    async fn test_run_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(dir.path().join("missing.csv"), dir.path().join("out.csv"));

        let err = run(&args).await.unwrap_err();
        assert!(matches!(err, vocab_prep::Error::MissingInput(_)));
        assert!(!dir.path().join("out.csv").exists());
    }

    #[tokio::test]
    async fn test_run_keeps_existing_sidecar_when_skipping() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, SIMPLE_EXPORT).unwrap();
        std::fs::write(transcript_path(&output), "earlier run").unwrap();

        let args = Args {
            no_transcript: true,
            ..args_for(input, output.clone())
        };
        run(&args).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(transcript_path(&output)).unwrap(),
            "earlier run"
        );
        assert_eq!(existing_transcript(&output), Some(transcript_path(&output)));
    }

    #[test]
    fn test_existing_transcript_none_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(existing_transcript(&dir.path().join("out.csv")), None);
    }

    #[cfg(feature = "transcript")]
    mod transcript {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const WATCH_PAGE: &str = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "key123"});</script>"#;

        async fn mock_youtube(server: &MockServer, player: serde_json::Value) {
            Mock::given(method("GET"))
                .and(path("/watch"))
                .respond_with(ResponseTemplate::new(200).set_body_string(WATCH_PAGE))
                .mount(server)
                .await;
            Mock::given(method("POST"))
                .and(path("/youtubei/v1/player"))
                .respond_with(ResponseTemplate::new(200).set_body_json(player))
                .mount(server)
                .await;
        }

        fn setup(server: &MockServer) -> (tempfile::TempDir, Args) {
            let dir = tempfile::tempdir().unwrap();
            let input = dir.path().join("export.csv");
            std::fs::write(&input, SIMPLE_EXPORT).unwrap();
            let args = Args {
                youtube_url: server.uri(),
                ..args_for(input, dir.path().join("out.csv"))
            };
            (dir, args)
        }

        #[tokio::test]
        async fn test_run_writes_transcript_sidecar() {
            let server = MockServer::start().await;
            mock_youtube(
                &server,
                json!({
                    "playabilityStatus": { "status": "OK" },
                    "captions": { "playerCaptionsTracklistRenderer": { "captionTracks": [{
                        "baseUrl": format!("{}/api/timedtext?v=vid&lang=ru", server.uri()),
                        "languageCode": "ru"
                    }]}}
                }),
            )
            .await;
            Mock::given(method("GET"))
                .and(path("/api/timedtext"))
                .respond_with(ResponseTemplate::new(200).set_body_string(
                    r#"<transcript><text start="0" dur="1">Кот спит</text><text start="1" dur="1">Тихо</text></transcript>"#,
                ))
                .mount(&server)
                .await;

            let (_dir, args) = setup(&server);
            run(&args).await.unwrap();

            let sidecar = transcript_path(&args.output);
            assert_eq!(std::fs::read_to_string(sidecar).unwrap(), "Кот спит\nТихо");
        }

        #[tokio::test]
        async fn test_run_without_sidecar_when_transcripts_disabled() {
            let server = MockServer::start().await;
            mock_youtube(&server, json!({ "playabilityStatus": { "status": "OK" } })).await;

            let (_dir, args) = setup(&server);
            run(&args).await.unwrap();

            assert!(args.output.exists());
            assert!(!transcript_path(&args.output).exists());
        }
    }
}
