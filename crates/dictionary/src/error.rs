use thiserror::Error;

#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The IPA string shows no stressed syllable (`ˈ` or an accepted
    /// apostrophe variant).
    #[error("phonetic transcription doesn't show a stressed syllable")]
    NoStressMark,

    #[error("no entry for word {0:?}")]
    NotFound(String),

    #[error("failed to persist dictionary: {0}")]
    Persist(#[from] std::io::Error),

    #[error("dictionary file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Browser(#[from] wortbot_browser::BrowserError),

    #[error(transparent)]
    Cache(#[from] wortbot_cache::CacheError),

    #[error(transparent)]
    Media(#[from] wortbot_media::MediaError),
}

pub type Result<T> = std::result::Result<T, DictionaryError>;
