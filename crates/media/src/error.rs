use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("screenshot is blank, maybe the magnification was overdone")]
    BlankCapture,

    #[error("capture region is empty ({0})")]
    EmptyRegion(String),

    #[error("background fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Compositor(String),
}

pub type Result<T> = std::result::Result<T, MediaError>;
