//! Build Anki vocabulary decks from CSV word lists.
//!
//! Each CSV row becomes one note. Rows from all files are deduplicated by
//! key term, the last occurrence winning, and every note gets a GUID derived
//! from the study mode and the key term. Importing a rebuilt package into
//! Anki therefore updates existing cards instead of duplicating them.
//!
//! # CSV format
//!
//! No header row; columns are
//! `key_term, translation, example, example_translation, tags`:
//!
//! ```text
//! кот,cat,Кот спит,The cat sleeps,animals
//! дом,house
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use vocab_deck::{CardMode, DeckBuilder};
//!
//! # fn main() -> vocab_deck::Result<()> {
//! let mut builder = DeckBuilder::new(CardMode::Production);
//! builder.add_file("vocab.csv")?;
//! let cards = builder.write_apkg("russian.apkg")?;
//! println!("Created russian.apkg with {} cards", cards);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dedup;
pub mod entry;
pub mod error;
pub mod mode;
pub mod model;
pub mod note;

mod apkg;
mod deck;
mod sql;

pub use apkg::ApkgWriter;
pub use deck::{DeckBuilder, FileSummary, VocabDeck};
pub use dedup::deduplicate;
pub use entry::{VocabEntry, read_csv, read_entries};
pub use error::{Error, Result};
pub use mode::CardMode;
pub use model::{CardTemplate, NoteModel};
pub use note::{VocabNote, note_guid};
