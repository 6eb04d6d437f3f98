//! .apkg file generation.
//!
//! A package is a ZIP holding a `collection.anki2` SQLite database and a
//! `media` manifest. Vocabulary decks carry no media, so the manifest is empty.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use sha1::{Digest, Sha1};
use tempfile::TempDir;
use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::deck::VocabDeck;
use crate::error::Result;
use crate::model::NoteModel;
use crate::sql::{
    DECK_OPTIONS_ID, FIELD_SEPARATOR, SCHEMA, SCHEMA_VERSION, collection_conf, deck_options,
};

/// Id of the deck every collection must contain.
const DEFAULT_DECK_ID: i64 = 1;

/// Writes a [`VocabDeck`] as an Anki package.
pub struct ApkgWriter<'a> {
    deck: &'a VocabDeck,
}

impl<'a> ApkgWriter<'a> {
    /// Create a writer for `deck`.
    pub fn new(deck: &'a VocabDeck) -> Self {
        Self { deck }
    }

    /// Build the package and write it to `path`.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("collection.anki2");

        {
            let conn = Connection::open(&db_path)?;
            self.create_database(&conn)?;
        }

        let file = std::fs::File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("collection.anki2", options)?;
        let db_bytes = std::fs::read(&db_path)?;
        zip.write_all(&db_bytes)?;

        zip.start_file("media", options)?;
        zip.write_all(b"{}")?;

        zip.finish()?;
        Ok(())
    }

    /// Create the collection schema and insert the deck's notes and cards.
    fn create_database(&self, conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA)?;

        let now = current_timestamp();
        let now_ms = now * 1000;
        let deck = self.deck;

        let models_json = build_models_json(&deck.model, deck.id, now)?;
        let decks_json = build_decks_json(deck, now)?;
        let conf_json = serde_json::to_string(&collection_conf(deck.id, deck.model.id))?;
        let dconf_json = serde_json::to_string(&deck_options())?;

        conn.execute(
            "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
             VALUES (1, ?, ?, ?, ?, 0, -1, 0, ?, ?, ?, ?, '{}')",
            rusqlite::params![
                now,
                now_ms,
                now_ms,
                SCHEMA_VERSION,
                conf_json,
                models_json,
                decks_json,
                dconf_json
            ],
        )?;

        let separator = FIELD_SEPARATOR.to_string();
        let sort_index = deck.model.sort_field_index();
        let requirements: Vec<Vec<usize>> = deck
            .model
            .templates
            .iter()
            .map(|template| required_fields(&deck.model, &template.front))
            .collect();
        let mut card_id = now_ms;
        let mut skipped = 0usize;

        for (position, note) in deck.notes.iter().enumerate() {
            // Note ids only need to be unique inside the package; Anki
            // matches on guid when importing.
            let note_id = now_ms + position as i64;
            let sort_field = note.fields.get(sort_index).cloned().unwrap_or_default();

            conn.execute(
                "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
                 VALUES (?, ?, ?, ?, -1, ?, ?, ?, ?, 0, '')",
                rusqlite::params![
                    note_id,
                    note.guid,
                    deck.model.id,
                    now,
                    note.tags_string(),
                    note.fields.join(&separator),
                    sort_field,
                    compute_checksum(&sort_field)
                ],
            )?;

            for (ord, required) in requirements.iter().enumerate() {
                if !generates_card(&note.fields, required) {
                    skipped += 1;
                    continue;
                }
                conn.execute(
                    "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data)
                     VALUES (?, ?, ?, ?, ?, -1, 0, 0, ?, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                    rusqlite::params![
                        card_id,
                        note_id,
                        deck.id,
                        ord as i64,
                        now,
                        position as i64 + 1
                    ],
                )?;
                card_id += 1;
            }
        }

        debug!(
            notes = deck.notes.len(),
            skipped_cards = skipped,
            deck_id = deck.id,
            "populated collection"
        );
        Ok(())
    }
}

/// Build the `col.models` JSON for the deck's note type.
fn build_models_json(model: &NoteModel, deck_id: i64, now: i64) -> Result<String> {
    let fields: Vec<serde_json::Value> = model
        .fields
        .iter()
        .enumerate()
        .map(|(i, name)| {
            serde_json::json!({
                "name": name,
                "ord": i,
                "sticky": false,
                "rtl": false,
                "font": "Arial",
                "size": 20,
                "media": []
            })
        })
        .collect();

    let templates: Vec<serde_json::Value> = model
        .templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            serde_json::json!({
                "name": t.name,
                "ord": i,
                "qfmt": t.front,
                "afmt": t.back,
                "bqfmt": "",
                "bafmt": "",
                "did": null,
                "bfont": "",
                "bsize": 0
            })
        })
        .collect();

    let model_obj = serde_json::json!({
        "id": model.id,
        "name": model.name,
        "type": 0,
        "mod": now,
        "usn": -1,
        "sortf": model.sort_field_index(),
        "did": deck_id,
        "tmpls": templates,
        "flds": fields,
        "css": model.css,
        "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
        "latexPost": "\\end{document}",
        "latexsvg": false,
        "req": build_requirements(model)
    });

    let models: HashMap<String, serde_json::Value> =
        HashMap::from([(model.id.to_string(), model_obj)]);
    Ok(serde_json::to_string(&models)?)
}

/// Build the `col.decks` JSON: the mandatory Default deck plus ours.
fn build_decks_json(deck: &VocabDeck, now: i64) -> Result<String> {
    let deck_obj = |id: i64, name: &str| {
        serde_json::json!({
            "id": id,
            "mod": now,
            "name": name,
            "usn": -1,
            "lrnToday": [0, 0],
            "revToday": [0, 0],
            "newToday": [0, 0],
            "timeToday": [0, 0],
            "collapsed": false,
            "browserCollapsed": false,
            "desc": "",
            "dyn": 0,
            "conf": DECK_OPTIONS_ID,
            "extendNew": 10,
            "extendRev": 50
        })
    };

    let decks: HashMap<String, serde_json::Value> = HashMap::from([
        (DEFAULT_DECK_ID.to_string(), deck_obj(DEFAULT_DECK_ID, "Default")),
        (deck.id.to_string(), deck_obj(deck.id, &deck.name)),
    ]);
    Ok(serde_json::to_string(&decks)?)
}

/// Which fields each template needs to be non-empty to produce a card.
fn build_requirements(model: &NoteModel) -> Vec<serde_json::Value> {
    model
        .templates
        .iter()
        .enumerate()
        .map(|(ord, template)| {
            serde_json::json!([ord, "any", required_fields(model, &template.front)])
        })
        .collect()
}

/// Indices of the fields a front template references, or the first field
/// when it references none.
fn required_fields(model: &NoteModel, front: &str) -> Vec<usize> {
    let referenced: Vec<usize> = model
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| front.contains(&format!("{{{{{}}}}}", f)))
        .map(|(i, _)| i)
        .collect();

    if referenced.is_empty() {
        vec![0]
    } else {
        referenced
    }
}

/// An "any" requirement: at least one required field has content.
fn generates_card(fields: &[String], required: &[usize]) -> bool {
    required
        .iter()
        .any(|&i| fields.get(i).is_some_and(|f| !f.trim().is_empty()))
}

/// Current Unix timestamp in seconds.
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Sort field checksum: first 32 bits of the SHA-1 of the tag-free text.
///
/// Anki compares this value to spot duplicate first fields.
fn compute_checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(strip_html(sort_field).as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::VocabEntry;
    use crate::mode::CardMode;
    use tempfile::tempdir;

    fn sample_deck() -> VocabDeck {
        let mut deck = VocabDeck::with_default_name(CardMode::Production);
        deck.add_entries(vec![VocabEntry {
            key_term: "кот".to_string(),
            translation: "cat".to_string(),
            example: String::new(),
            example_translation: String::new(),
            tags: vec!["animals".to_string()],
        }]);
        deck
    }

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(compute_checksum("кот"), compute_checksum("кот"));
        assert_eq!(compute_checksum("<b>кот</b>"), compute_checksum("кот"));
        assert!(compute_checksum("кот") >= 0);
    }

    #[test]
    fn test_checksum_matches_anki() {
        // int(sha1("кот").hexdigest()[:8], 16)
        assert_eq!(compute_checksum("кот"), 2_659_141_720);
    }

    #[test]
    fn test_card_needs_a_required_field() {
        let fields: Vec<String> = ["дом", "", "", ""].iter().map(|s| s.to_string()).collect();
        assert!(!generates_card(&fields, &[1, 3]));
        assert!(generates_card(&fields, &[0, 2]));

        let fields: Vec<String> = ["дом", "", "", "a house"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(generates_card(&fields, &[1, 3]));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<b>Hello</b> World"), "Hello World");
        assert_eq!(strip_html("No HTML"), "No HTML");
    }

    #[test]
    fn test_requirements_follow_front_template() {
        let production = NoteModel::for_mode(CardMode::Production);
        let req = build_requirements(&production);
        // Translation (1) and ExampleTranslation (3) are on the production front.
        assert_eq!(req[0], serde_json::json!([0, "any", [1, 3]]));

        let recognition = NoteModel::for_mode(CardMode::Recognition);
        let req = build_requirements(&recognition);
        assert_eq!(req[0], serde_json::json!([0, "any", [0, 2]]));
    }

    #[test]
    fn test_decks_json_contains_default_and_deck() {
        let deck = sample_deck();
        let json: serde_json::Value =
            serde_json::from_str(&build_decks_json(&deck, 0).unwrap()).unwrap();
        assert_eq!(json["1"]["name"], "Default");
        assert_eq!(json["1635890001"]["name"], "Russian Vocabulary");
    }

    #[test]
    fn test_write_apkg() {
        let deck = sample_deck();
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.apkg");

        ApkgWriter::new(&deck).write_to_file(&path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let file_names: Vec<_> = archive.file_names().collect();
        assert!(file_names.contains(&"collection.anki2"));
        assert!(file_names.contains(&"media"));
    }
}
