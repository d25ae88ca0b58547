//! Image post-processing for rendered cards: screenshot cropping,
//! trailing-whitespace trim, PNG encoding, and quote-card composition.

pub mod error;
pub mod image_ops;
pub mod quote;

pub use error::{MediaError, Result};
