//! Persisted dictionary.
//!
//! Entries live in one JSON file that is rewritten in full on every
//! mutation. The map is ordered by key, so iteration doubles as the
//! sorted listing.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    error::{DictionaryError, Result},
    word::Word,
};

pub struct Dictionary {
    name: String,
    path: PathBuf,
    entries: BTreeMap<String, Word>,
}

impl Dictionary {
    /// Load `<dir>/<name>.json`, creating an empty dictionary (and its
    /// file) if none exists yet.
    pub fn open(dir: impl AsRef<Path>, name: &str) -> Result<Self> {
        let path = dir.as_ref().join(format!("{name}.json"));

        let entries = if path.exists() {
            let raw = std::fs::read(&path)?;
            serde_json::from_slice(&raw)?
        } else {
            BTreeMap::new()
        };

        let dict = Self {
            name: name.to_string(),
            path,
            entries,
        };
        dict.save()?;
        info!(name, entries = dict.entries.len(), "opened dictionary");
        Ok(dict)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry and persist.
    pub fn add(&mut self, word: Word) -> Result<()> {
        debug!(key = word.data_key(), "adding word");
        self.entries.insert(word.data_key(), word);
        self.save()
    }

    /// Remove an entry by exact key and persist. Case-sensitive.
    pub fn remove(&mut self, key: &str) -> Result<Word> {
        let word = self
            .entries
            .remove(key)
            .ok_or_else(|| DictionaryError::NotFound(key.to_string()))?;
        self.save()?;
        Ok(word)
    }

    /// An exact key hit returns just that entry; otherwise a
    /// case-insensitive substring scan over the keys.
    pub fn search(&self, query: &str) -> Vec<&Word> {
        if let Some(word) = self.entries.get(query) {
            return vec![word];
        }

        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(key, _)| key.to_lowercase().contains(&query))
            .map(|(_, word)| word)
            .collect()
    }

    /// All entries, ordered by key.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.entries.values()
    }

    /// Rewrite the whole file. There is no partial persistence: the file
    /// always mirrors the in-memory map.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_vec_pretty(&self.entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::split_word;

    fn entry(word: &str, ipa: &str) -> Word {
        Word::new(split_word(word), ipa, "Verb", "bedeutung", "Beispiel.").unwrap()
    }

    #[test]
    fn add_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut dict = Dictionary::open(dir.path(), "test").unwrap();
            dict.add(entry("rein·joi·nen", "ˈraɪndʒɔɪnən")).unwrap();
            assert_eq!(dict.len(), 1);
        }

        let reloaded = Dictionary::open(dir.path(), "test").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.search("reinjoinen")[0].display_name(),
            "rein·joi·nen"
        );
    }

    #[test]
    fn remove_missing_word_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut dict = Dictionary::open(dir.path(), "test").unwrap();
        assert!(matches!(
            dict.remove("fehlt"),
            Err(DictionaryError::NotFound(_))
        ));
    }

    #[test]
    fn search_matches_exact_then_substring() {
        let dir = tempfile::tempdir().unwrap();
        let mut dict = Dictionary::open(dir.path(), "test").unwrap();
        dict.add(entry("lau·fen", "ˈlaʊfən")).unwrap();
        dict.add(entry("ver·lau·fen", "fɛɐˈlaʊfən")).unwrap();

        // Exact key hit returns only that entry.
        assert_eq!(dict.search("laufen").len(), 1);
        // Substring scan is case-insensitive.
        assert_eq!(dict.search("LAUF").len(), 2);
        assert!(dict.search("zzz").is_empty());
    }

    #[test]
    fn listing_is_sorted_by_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut dict = Dictionary::open(dir.path(), "test").unwrap();
        dict.add(entry("zel·ten", "ˈtsɛltən")).unwrap();
        dict.add(entry("an·geln", "ˈaŋəln")).unwrap();

        let keys: Vec<String> = dict.words().map(Word::data_key).collect();
        assert_eq!(keys, vec!["angeln", "zelten"]);
    }
}
