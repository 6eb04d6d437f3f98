//! Notes and their stable GUIDs.

use crate::entry::VocabEntry;
use crate::mode::CardMode;

/// Number of hex characters kept from the digest.
const GUID_LEN: usize = 10;

/// Stable note GUID for a key term.
///
/// First ten hex characters of the MD5 digest of `"{mode}:{key_term}"`.
/// Anki matches notes on GUID during import, so an edited row updates the
/// existing card instead of adding a second one.
pub fn note_guid(mode: CardMode, key_term: &str) -> String {
    let digest = md5::compute(format!("{}:{}", mode.as_str(), key_term).as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(GUID_LEN);
    hex
}

/// A note ready to be written to a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabNote {
    /// Import-merge key.
    pub guid: String,
    /// Field values in model order.
    pub fields: Vec<String>,
    /// Anki tags.
    pub tags: Vec<String>,
}

impl VocabNote {
    /// Map an entry to a note for `mode`.
    pub fn from_entry(entry: VocabEntry, mode: CardMode) -> Self {
        Self {
            guid: note_guid(mode, &entry.key_term),
            fields: vec![
                entry.key_term,
                entry.translation,
                entry.example,
                entry.example_translation,
            ],
            tags: entry.tags,
        }
    }

    /// The key term (first field).
    pub fn key_term(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// Tags in Anki's storage form: space separated with surrounding spaces.
    pub fn tags_string(&self) -> String {
        if self.tags.is_empty() {
            String::new()
        } else {
            format!(" {} ", self.tags.join(" "))
        }
    }
}
