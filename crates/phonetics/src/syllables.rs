//! Vowel-driven syllable segmentation of aligned phoneme tokens.

use crate::error::{PhoneticsError, Result};

/// Vowel phonemes (IPA plus plain Latin vowels).
pub const VOWELS: &str = "ɯəʏuʌɑʉyɤɞɪøɒoʊɵeɔœiaɶɨɜæɛɐɘaeiouAEIOU";

/// Whether any character of `s` is a vowel phoneme.
pub fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| VOWELS.contains(c))
}

/// Group aligned phoneme tokens and the word's characters into parallel
/// syllables.
///
/// The tokens must be aligned one-per-grapheme (`_` marks a silent
/// grapheme and contributes no phoneme). A syllable keeps absorbing
/// graphemes until it has a vowel; a new syllable starts when the next
/// phoneme is a vowel again.
///
/// Returns `(phoneme_syllables, word_syllables)`.
pub fn segment(phonemes: &[String], word: &str) -> Result<(Vec<String>, Vec<String>)> {
    let chars: Vec<char> = word.chars().collect();
    if phonemes.len() != chars.len() {
        return Err(PhoneticsError::AlignmentMismatch {
            phonemes: phonemes.len(),
            word: word.to_string(),
        });
    }

    let mut phoneme_syllables: Vec<String> = vec![String::new()];
    let mut word_syllables: Vec<String> = vec![String::new()];

    for i in 0..phonemes.len() {
        let last = phoneme_syllables.len() - 1;

        // A syllable without a vowel yet keeps absorbing graphemes.
        if !has_vowel(&phoneme_syllables[last]) {
            if phonemes[i] != "_" {
                phoneme_syllables[last].push_str(&phonemes[i]);
            }
            word_syllables[last].push(chars[i]);
            continue;
        }

        // Start a new syllable when the next phoneme is a vowel.
        if i + 1 < phonemes.len() && has_vowel(&phonemes[i + 1]) {
            phoneme_syllables.push(String::new());
            word_syllables.push(String::new());
        }

        let last = phoneme_syllables.len() - 1;
        phoneme_syllables[last].push_str(&phonemes[i]);
        word_syllables[last].push(chars[i]);
    }

    Ok((phoneme_syllables, word_syllables))
}

/// Column-aligned WORD/PHON display, one column per syllable, wrapped in
/// backticks for monospace chat rendering.
pub fn format_structure(word_syllables: &[String], phoneme_syllables: &[String]) -> String {
    let mut texts = Vec::with_capacity(word_syllables.len());
    let mut ipas = Vec::with_capacity(word_syllables.len());

    for i in 0..word_syllables.len() {
        let text = word_syllables[i].clone();
        let ipa = phoneme_syllables
            .get(i)
            .map(|s| s.replace('_', ""))
            .unwrap_or_default();

        let width = text.chars().count().max(ipa.chars().count());
        texts.push(pad_to(&text, width));
        ipas.push(pad_to(&ipa, width));
    }

    format!("`WORD: {}`\n`PHON: {}`", texts.join(" "), ipas.join(" "))
}

fn pad_to(s: &str, width: usize) -> String {
    let mut out = s.to_string();
    for _ in s.chars().count()..width {
        out.push(' ');
    }
    out
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn vowel_detection() {
        assert!(has_vowel("laʊ"));
        assert!(!has_vowel("lf"));
        assert!(!has_vowel(""));
    }

    #[test]
    fn segments_single_syllable() {
        let (phon, word) = segment(&tokens(&["l", "a", "ʊ", "f"]), "lauf").unwrap();
        assert_eq!(phon, vec!["laʊf"]);
        assert_eq!(word, vec!["lauf"]);
    }

    #[test]
    fn segments_two_syllables_on_vowel_boundary() {
        // "leise" -> l aɪ z ə _  (silent trailing e)
        let (phon, word) = segment(&tokens(&["l", "aɪ", "z", "ə", "_"]), "leise").unwrap();
        assert_eq!(phon.len(), word.len());
        assert_eq!(word.join(""), "leise");
        assert_eq!(phon.join("").replace('_', ""), "laɪzə");
        assert!(phon.len() == 2);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert!(matches!(
            segment(&tokens(&["l", "a"]), "lauf"),
            Err(PhoneticsError::AlignmentMismatch { .. })
        ));
    }

    #[test]
    fn formatting_aligns_columns() {
        let word = tokens(&["rein", "joi", "nen"]);
        let phon = tokens(&["raɪn", "dʒɔɪ", "nən"]);
        let out = format_structure(&word, &phon);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("`WORD: "));
        assert!(lines[1].starts_with("`PHON: "));
        // Both rows have identical visible width.
        assert_eq!(
            lines[0].trim_end_matches('`').chars().count(),
            lines[1].trim_end_matches('`').chars().count()
        );
    }
}
