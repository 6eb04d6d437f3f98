//! Study modes.
//!
//! A mode picks the card direction and pins the deck and model ids, so that
//! re-importing a package merges into the deck created by a previous run.

use std::fmt;

/// Which side of the card shows the key term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardMode {
    /// Translation on the front, key term on the back (active recall).
    #[default]
    Production,
    /// Key term on the front, translation on the back (passive vocabulary).
    Recognition,
}

impl CardMode {
    /// Lowercase name, also used as the GUID prefix.
    pub fn as_str(self) -> &'static str {
        match self {
            CardMode::Production => "production",
            CardMode::Recognition => "recognition",
        }
    }

    /// Fixed deck id.
    pub fn deck_id(self) -> i64 {
        match self {
            CardMode::Production => 1_635_890_001,
            CardMode::Recognition => 1_635_890_003,
        }
    }

    /// Fixed note type id.
    pub fn model_id(self) -> i64 {
        match self {
            CardMode::Production => 1_635_890_002,
            CardMode::Recognition => 1_635_890_004,
        }
    }

    /// Note type name.
    pub fn model_name(self) -> &'static str {
        match self {
            CardMode::Production => "Russian Vocabulary (Production)",
            CardMode::Recognition => "Russian Vocabulary (Recognition)",
        }
    }

    /// Deck name used when none is given.
    pub fn default_deck_name(self) -> &'static str {
        match self {
            CardMode::Production => "Russian Vocabulary",
            CardMode::Recognition => "Russian Passive Vocabulary",
        }
    }

    /// Short direction label such as `EN→RU`.
    pub fn direction(self) -> &'static str {
        match self {
            CardMode::Production => "EN→RU",
            CardMode::Recognition => "RU→EN",
        }
    }
}

impl fmt::Display for CardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_differ_between_modes() {
        assert_ne!(
            CardMode::Production.deck_id(),
            CardMode::Recognition.deck_id()
        );
        assert_ne!(
            CardMode::Production.model_id(),
            CardMode::Recognition.model_id()
        );
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(CardMode::Recognition.to_string(), "recognition");
    }
}
