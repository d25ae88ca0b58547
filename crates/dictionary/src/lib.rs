//! Dictionary entries: the word model, the persisted store, and the
//! browser-driven entry-card render flow.

pub mod error;
pub mod render;
pub mod store;
pub mod word;

pub use {
    error::{DictionaryError, Result},
    render::{EntryCardRenderer, EntryCardRequest},
    store::Dictionary,
    word::{Word, split_word},
};
