use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx or semantically broken API answer, raw body embedded.
    #[error("template API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed template payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Browser(#[from] wortbot_browser::BrowserError),

    #[error(transparent)]
    Cache(#[from] wortbot_cache::CacheError),

    #[error(transparent)]
    Media(#[from] wortbot_media::MediaError),

    #[error("cached object graph is corrupt: {0}")]
    CorruptCache(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
