//! Create an Anki deck from Russian vocabulary CSV files.
//!
//! ```text
//! create-deck *.csv -o russian.apkg
//! create-deck --mode recognition passive_vocab.csv -o passive.apkg
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use vocab_deck::{CardMode, DeckBuilder};

// ============================================================================
// CLI Arguments
// ============================================================================

/// Create an Anki deck from Russian vocabulary CSV files.
#[derive(Parser, Debug)]
#[command(name = "create-deck")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV files to process
    #[arg(required = true)]
    csv_files: Vec<PathBuf>,

    /// Output .apkg file
    #[arg(short, long, default_value = "russian.apkg")]
    output: PathBuf,

    /// Deck name (default: 'Russian Vocabulary' for production, 'Russian Passive Vocabulary' for recognition)
    #[arg(short, long)]
    name: Option<String>,

    /// Card mode: 'production' (EN front, RU back) or 'recognition' (RU front, EN back)
    #[arg(short, long, value_enum, default_value_t = Mode::Production)]
    mode: Mode,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// English on the front, Russian on the back
    Production,
    /// Russian on the front, English on the back
    Recognition,
}

impl From<Mode> for CardMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Production => CardMode::Production,
            Mode::Recognition => CardMode::Recognition,
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = DeckBuilder::check_inputs(&args.csv_files) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> vocab_deck::Result<()> {
    let mode = CardMode::from(args.mode);
    let mut builder = DeckBuilder::new(mode);
    if let Some(ref name) = args.name {
        builder = builder.name(name);
    }

    println!(
        "Creating deck '{}' ({})...",
        builder.deck_name(),
        mode.direction()
    );

    for csv_file in &args.csv_files {
        let count = builder.add_file(csv_file)?;
        println!("  {}: {} entries", display_name(csv_file), count);
    }

    let cards = builder.write_apkg(&args.output)?;
    debug!(output = %args.output.display(), %mode, "package written");
    println!("Created {} with {} cards", args.output.display(), cards);
    Ok(())
}

/// File name for progress lines, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
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
