//! Note type definitions for the two study modes.

use crate::mode::CardMode;

/// Field names in storage order.
pub const FIELDS: [&str; 4] = ["Russian", "Translation", "Example", "ExampleTranslation"];

/// Card styling shared by both note types.
pub const CSS: &str = r#".card {
    font-family: arial;
    font-size: 20px;
    text-align: center;
    color: black;
    background-color: white;
}
.russian {
    font-size: 28px;
    font-weight: bold;
    margin-bottom: 10px;
}
.translation {
    font-size: 22px;
    color: #333;
    margin: 15px 0;
}
.example {
    margin-top: 20px;
    padding: 10px;
    background-color: #f5f5f5;
    border-radius: 5px;
}
.example-ru {
    font-size: 18px;
    color: #444;
    margin-bottom: 5px;
}
.example-trans {
    font-size: 16px;
    color: #666;
    font-style: italic;
}"#;

const RUSSIAN_BLOCK: &str = r#"<div class="russian">{{Russian}}</div>"#;

const TRANSLATION_BLOCK: &str = r#"<div class="translation">{{Translation}}</div>"#;

const EXAMPLE_BLOCK: &str = r#"{{#Example}}
<div class="example">
    <div class="example-ru">{{Example}}</div>
</div>
{{/Example}}"#;

const EXAMPLE_TRANSLATION_BLOCK: &str = r#"{{#ExampleTranslation}}
<div class="example">
    <div class="example-trans">{{ExampleTranslation}}</div>
</div>
{{/ExampleTranslation}}"#;

const ANSWER_DIVIDER: &str = r#"<hr id="answer">"#;

/// A card template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    /// Template name.
    pub name: String,
    /// Question side.
    pub front: String,
    /// Answer side.
    pub back: String,
}

/// A note type: fields, templates and styling.
#[derive(Debug, Clone)]
pub struct NoteModel {
    /// Model id, fixed per mode.
    pub id: i64,
    /// Model name.
    pub name: String,
    /// Field names in order.
    pub fields: Vec<String>,
    /// Card templates; one card is generated per template.
    pub templates: Vec<CardTemplate>,
    /// Card CSS.
    pub css: String,
}

impl NoteModel {
    /// The note type used for `mode`.
    pub fn for_mode(mode: CardMode) -> Self {
        // Production asks with the translation, recognition with the word.
        let (prompt, prompt_example, answer, answer_example) = match mode {
            CardMode::Production => (
                TRANSLATION_BLOCK,
                EXAMPLE_TRANSLATION_BLOCK,
                RUSSIAN_BLOCK,
                EXAMPLE_BLOCK,
            ),
            CardMode::Recognition => (
                RUSSIAN_BLOCK,
                EXAMPLE_BLOCK,
                TRANSLATION_BLOCK,
                EXAMPLE_TRANSLATION_BLOCK,
            ),
        };

        let template = CardTemplate {
            name: "Card 1".to_string(),
            front: format!("{prompt}\n{prompt_example}"),
            back: format!("{prompt}\n{ANSWER_DIVIDER}\n{answer}\n{answer_example}"),
        };

        Self {
            id: mode.model_id(),
            name: mode.model_name().to_string(),
            fields: FIELDS.iter().map(|f| f.to_string()).collect(),
            templates: vec![template],
            css: CSS.to_string(),
        }
    }

    /// Index of the field Anki sorts by.
    pub fn sort_field_index(&self) -> usize {
        0
    }
}
