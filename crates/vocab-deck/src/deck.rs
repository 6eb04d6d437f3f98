//! Deck assembly.

use std::path::Path;

use tracing::{debug, info};

use crate::dedup::deduplicate;
use crate::entry::{VocabEntry, read_csv};
use crate::error::{Error, Result};
use crate::mode::CardMode;
use crate::model::NoteModel;
use crate::note::VocabNote;

/// A deck of vocabulary notes for one study mode.
#[derive(Debug, Clone)]
pub struct VocabDeck {
    /// Deck id, fixed per mode.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Study mode.
    pub mode: CardMode,
    /// Note type shared by every note.
    pub model: NoteModel,
    /// Notes in insertion order.
    pub notes: Vec<VocabNote>,
}

impl VocabDeck {
    /// Create an empty deck.
    pub fn new(name: impl Into<String>, mode: CardMode) -> Self {
        Self {
            id: mode.deck_id(),
            name: name.into(),
            mode,
            model: NoteModel::for_mode(mode),
            notes: Vec::new(),
        }
    }

    /// Create an empty deck named after the mode's default.
    pub fn with_default_name(mode: CardMode) -> Self {
        Self::new(mode.default_deck_name(), mode)
    }

    /// Deduplicate `entries` and add one note per surviving key term.
    ///
    /// Returns the number of notes added.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = VocabEntry>) -> usize {
        let unique = deduplicate(entries);
        let count = unique.len();
        let mode = self.mode;
        self.notes
            .extend(unique.into_iter().map(|entry| VocabNote::from_entry(entry, mode)));
        count
    }

    /// Number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the deck has no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Per-file entry counts collected while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Path as given.
    pub path: std::path::PathBuf,
    /// Entries read from the file, before deduplication.
    pub entries: usize,
}

/// Builds a deck from vocabulary CSV files.
///
/// # Example
///
/// ```no_run
/// use vocab_deck::{CardMode, DeckBuilder};
///
/// # fn main() -> vocab_deck::Result<()> {
/// let mut builder = DeckBuilder::new(CardMode::Recognition).name("Passive");
/// builder.add_file("week1.csv")?;
/// builder.add_file("week2.csv")?;
/// let count = builder.write_apkg("passive.apkg")?;
/// println!("Created passive.apkg with {} cards", count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeckBuilder {
    mode: CardMode,
    name: Option<String>,
    entries: Vec<VocabEntry>,
    files: Vec<FileSummary>,
}

impl DeckBuilder {
    /// Create a builder for `mode`.
    pub fn new(mode: CardMode) -> Self {
        Self {
            mode,
            name: None,
            entries: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Set the deck name. Defaults to the mode's default name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The deck name that will be used.
    pub fn deck_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.mode.default_deck_name())
    }

    /// The study mode.
    pub fn mode(&self) -> CardMode {
        self.mode
    }

    /// Check that every path exists, before any file is read.
    pub fn check_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                return Err(Error::MissingInput(path.to_path_buf()));
            }
        }
        Ok(())
    }

    /// Read a CSV file and queue its entries. Returns the entry count.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        let entries = read_csv(path)?;
        let count = entries.len();
        self.entries.extend(entries);
        self.files.push(FileSummary {
            path: path.to_path_buf(),
            entries: count,
        });
        Ok(count)
    }

    /// Queue already parsed entries.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = VocabEntry>) {
        self.entries.extend(entries);
    }

    /// Files read so far.
    pub fn files(&self) -> &[FileSummary] {
        &self.files
    }

    /// Assemble the deck.
    pub fn build(&self) -> VocabDeck {
        let mut deck = VocabDeck::new(self.deck_name(), self.mode);
        let count = deck.add_entries(self.entries.iter().cloned());
        debug!(
            queued = self.entries.len(),
            unique = count,
            "deduplicated entries"
        );
        deck
    }

    /// Assemble the deck and write it as an `.apkg`. Returns the card count.
    pub fn write_apkg(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let deck = self.build();
        crate::ApkgWriter::new(&deck).write_to_file(path)?;
        info!(path = %path.display(), notes = deck.len(), "wrote package");
        Ok(deck.len())
    }
}
