use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhoneticsError {
    #[error("transcription request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered but did not report success; the raw response
    /// is embedded for diagnosis.
    #[error("transcription service reported failure: {response}")]
    Upstream { response: String },

    #[error("malformed service response: {0}")]
    MalformedResponse(String),

    #[error("phonemes {phonemes:?} and word {word:?} have different lengths")]
    AlignmentMismatch { phonemes: usize, word: String },

    #[error(transparent)]
    Cache(#[from] wortbot_cache::CacheError),
}

pub type Result<T> = std::result::Result<T, PhoneticsError>;
