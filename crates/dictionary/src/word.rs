//! The dictionary word model.

use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, Result};

/// Separators users may type between syllables.
const SYLLABLE_SEPARATORS: &str = "·.*";

/// The canonical stress mark, plus apostrophe variants users type instead.
const STRESS_MARK: char = 'ˈ';
const STRESS_VARIANTS: [char; 3] = ['\'', '´', '`'];

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub syllables: Vec<String>,
    pub ipa: String,
    pub part_of_speech: String,
    pub meaning: String,
    pub example: String,
}

impl Word {
    /// Build an entry, normalizing the stress mark and rejecting IPA
    /// without one.
    pub fn new(
        syllables: Vec<String>,
        ipa: &str,
        part_of_speech: impl Into<String>,
        meaning: impl Into<String>,
        example: impl Into<String>,
    ) -> Result<Self> {
        let ipa = normalize_ipa(ipa);
        if !ipa.contains(STRESS_MARK) {
            return Err(DictionaryError::NoStressMark);
        }
        Ok(Self {
            syllables,
            ipa,
            part_of_speech: part_of_speech.into(),
            meaning: meaning.into(),
            example: example.into(),
        })
    }

    /// Build a display-only entry without requiring a stress mark
    /// (phonetics predictions carry none).
    pub fn unstressed(syllables: Vec<String>, ipa: &str) -> Self {
        Self {
            syllables,
            ipa: normalize_ipa(ipa),
            part_of_speech: String::new(),
            meaning: String::new(),
            example: String::new(),
        }
    }

    /// Storage key: the syllables joined without separators.
    pub fn data_key(&self) -> String {
        self.syllables.concat()
    }

    /// Display form: syllables joined with `·`.
    pub fn display_name(&self) -> String {
        self.syllables.join("·")
    }

    /// The chat command that reproduces this entry's render.
    pub fn render_command(&self) -> String {
        format!(
            "!wort render {:?} {:?} {:?} {:?} {:?}",
            self.display_name(),
            self.ipa,
            self.part_of_speech,
            self.meaning,
            self.example,
        )
    }
}

fn normalize_ipa(ipa: &str) -> String {
    ipa.chars()
        .map(|c| {
            if STRESS_VARIANTS.contains(&c) {
                STRESS_MARK
            } else {
                c
            }
        })
        .collect()
}

/// Split a user-typed word on syllable separators. Backslashes are
/// dropped (they escape separators in chat markup).
pub fn split_word(word: &str) -> Vec<String> {
    let mut out = vec![String::new()];
    for c in word.chars() {
        if SYLLABLE_SEPARATORS.contains(c) {
            out.push(String::new());
        } else if c != '\\' {
            let last = out.len() - 1;
            out[last].push(c);
        }
    }
    out
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_any_separator() {
        assert_eq!(split_word("rein·joi·nen"), vec!["rein", "joi", "nen"]);
        assert_eq!(split_word("rein.joi*nen"), vec!["rein", "joi", "nen"]);
        assert_eq!(split_word("lauf"), vec!["lauf"]);
    }

    #[test]
    fn split_drops_backslashes() {
        assert_eq!(split_word(r"rein\·joi"), vec!["rein", "joi"]);
    }

    #[test]
    fn stress_variants_are_normalized() {
        let word = Word::new(
            split_word("rein·joi·nen"),
            "'raɪndʒɔɪnən",
            "Verb",
            "einen Anruf betreten",
            "Er ist wieder reingejoined.",
        )
        .unwrap();
        assert_eq!(word.ipa, "ˈraɪndʒɔɪnən");
    }

    #[test]
    fn missing_stress_mark_is_rejected() {
        assert!(matches!(
            Word::new(split_word("lauf"), "laʊf", "Verb", "to run", "Ich laufe."),
            Err(DictionaryError::NoStressMark)
        ));
    }

    #[test]
    fn keys_and_display() {
        let word = Word::new(
            split_word("rein·joi·nen"),
            "ˈraɪndʒɔɪnən",
            "Verb",
            "",
            "",
        )
        .unwrap();
        assert_eq!(word.data_key(), "reinjoinen");
        assert_eq!(word.display_name(), "rein·joi·nen");
        assert!(word.render_command().starts_with("!wort render \"rein·joi·nen\""));
    }
}
