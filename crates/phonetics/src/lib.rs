//! Grapheme-to-phoneme transcription and syllable segmentation.
//!
//! Wraps the BAS `runG2P` web service: a multipart POST yields an XML
//! envelope with a success flag and a download link; a second GET fetches
//! the aligned phoneme tokens. Raw responses are cached by (word,
//! language) so repeated lookups never hit the service.

pub mod client;
pub mod error;
pub mod syllables;

pub use {
    client::PhoneticsClient,
    error::{PhoneticsError, Result},
};
