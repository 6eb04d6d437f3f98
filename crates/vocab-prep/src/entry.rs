//! Normalized entries and the preprocessed CSV writer.

use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Header row of the preprocessed CSV.
pub const OUTPUT_HEADER: [&str; 6] = [
    "Word",
    "Translation",
    "Context (RU)",
    "Context (EN)",
    "POS",
    "Is Chunk",
];

/// One vocabulary item in format-independent form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Dictionary form.
    pub lemma: String,
    /// Form as it appeared in the video.
    pub word_form: String,
    /// Part of speech, when the export provides it.
    pub part_of_speech: String,
    /// Translation, when the export provides it.
    pub translation: String,
    /// Sentence in the studied language.
    pub context_source_lang: String,
    /// Sentence in the learner's language.
    pub context_target_lang: String,
    /// Multi-word collocation rather than a single word.
    pub is_multiword_chunk: bool,
}

impl NormalizedEntry {
    /// Cells in [`OUTPUT_HEADER`] order.
    pub fn to_row(&self) -> [&str; 6] {
        [
            self.lemma.as_str(),
            self.translation.as_str(),
            self.context_source_lang.as_str(),
            self.context_target_lang.as_str(),
            self.part_of_speech.as_str(),
            if self.is_multiword_chunk { "yes" } else { "" },
        ]
    }
}

/// What an extractor found in an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Entries in file order.
    pub entries: Vec<NormalizedEntry>,
    /// First video id seen in the export.
    pub video_id: Option<String>,
}

impl Extraction {
    /// Number of multi-word chunk entries.
    pub fn chunk_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_multiword_chunk).count()
    }
}

/// Write entries as CSV, header first.
pub fn write_entries<W: Write>(writer: W, entries: &[NormalizedEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(OUTPUT_HEADER)?;
    for entry in entries {
        writer.write_record(entry.to_row())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write entries to a preprocessed CSV file.
pub fn write_preprocessed_csv(path: impl AsRef<Path>, entries: &[NormalizedEntry]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_entries(file, entries)
}

/// Path of the transcript sidecar for an output file.
///
/// `preprocessed.csv` becomes `preprocessed.transcript.txt`.
pub fn transcript_path(output: impl AsRef<Path>) -> std::path::PathBuf {
    output.as_ref().with_extension("transcript.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(entries: &[NormalizedEntry]) -> String {
        let mut buf = Vec::new();
        write_entries(&mut buf, entries).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_only_for_no_entries() {
        assert_eq!(
            render(&[]),
            "Word,Translation,Context (RU),Context (EN),POS,Is Chunk\n"
        );
    }

    #[test]
    fn test_row_layout() {
        let entry = NormalizedEntry {
            lemma: "говорить".to_string(),
            word_form: "говорит".to_string(),
            part_of_speech: "VERB".to_string(),
            translation: "to speak".to_string(),
            context_source_lang: "Он говорит, что".to_string(),
            context_target_lang: "He says that".to_string(),
            is_multiword_chunk: false,
        };
        let output = render(&[entry]);
        let line = output.lines().nth(1).unwrap();
        assert_eq!(
            line,
            "говорить,to speak,\"Он говорит, что\",He says that,VERB,"
        );
    }

    #[test]
    fn test_chunk_flag_rendered_as_yes() {
        let entry = NormalizedEntry {
            lemma: "в общем".to_string(),
            word_form: "в общем".to_string(),
            is_multiword_chunk: true,
            ..Default::default()
        };
        let output = render(&[entry]);
        assert!(output.lines().nth(1).unwrap().ends_with(",yes"));
    }

    #[test]
    fn test_chunk_count() {
        let extraction = Extraction {
            entries: vec![
                NormalizedEntry {
                    is_multiword_chunk: true,
                    ..Default::default()
                },
                NormalizedEntry::default(),
            ],
            video_id: None,
        };
        assert_eq!(extraction.chunk_count(), 1);
    }

    #[test]
    fn test_transcript_path() {
        assert_eq!(
            transcript_path("out/preprocessed.csv"),
            Path::new("out/preprocessed.transcript.txt")
        );
        assert_eq!(
            transcript_path("notes"),
            Path::new("notes.transcript.txt")
        );
    }
}
