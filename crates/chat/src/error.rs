use thiserror::Error;

/// Handler failures surfaced at the dispatch boundary.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The user's arguments don't fit the command; the router answers
    /// with the usage embed instead of an error trace.
    #[error("{0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Dictionary(#[from] wortbot_dictionary::DictionaryError),

    #[error(transparent)]
    Phonetics(#[from] wortbot_phonetics::PhoneticsError),

    #[error(transparent)]
    Template(#[from] wortbot_templates::TemplateError),

    #[error(transparent)]
    Media(#[from] wortbot_media::MediaError),

    /// Delivery failure reported by the sink.
    #[error(transparent)]
    Sink(#[from] anyhow::Error),
}
