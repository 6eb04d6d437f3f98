//! Deduplication of vocabulary entries by key term.

use std::collections::HashMap;

use crate::entry::VocabEntry;

/// Collapse entries that share a key term.
///
/// The last occurrence of a key term wins. The result keeps the position
/// where each key term was first seen.
pub fn deduplicate(entries: impl IntoIterator<Item = VocabEntry>) -> Vec<VocabEntry> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<VocabEntry> = Vec::new();

    for entry in entries {
        match positions.get(&entry.key_term) {
            Some(&index) => unique[index] = entry,
            None => {
                positions.insert(entry.key_term.clone(), unique.len());
                unique.push(entry);
            }
        }
    }

    unique
}
