//! Typed configuration for the wortbot services.
//!
//! Config files are discovered as `wortbot.{toml,yaml,yml,json}` in the
//! working directory first, then in the user config directory. Missing
//! files and missing sections fall back to defaults, so a bare checkout
//! runs without any configuration at all.

pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::WortbotConfig,
};
