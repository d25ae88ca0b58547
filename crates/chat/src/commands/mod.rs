//! The default command set.

pub mod dictionary;
pub mod overview;
pub mod phonetics;
pub mod quote;
pub mod templates;

use crate::{error::ChatError, parse::ArgValue, router::Command};

/// Every command the bot answers to.
pub fn default_commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(overview::HelpCommand),
        Box::new(overview::WordOverviewCommand),
        Box::new(overview::PosterOverviewCommand),
        Box::new(dictionary::RenderCommand),
        Box::new(dictionary::AddCommand),
        Box::new(dictionary::RemoveCommand),
        Box::new(dictionary::ListCommand),
        Box::new(dictionary::SearchCommand),
        Box::new(phonetics::G2pCommand),
        Box::new(templates::SearchCommand),
        Box::new(templates::AttrsCommand),
        Box::new(templates::RenderCommand),
        Box::new(quote::QuoteCommand),
    ]
}

/// Fetch a required string argument.
pub(crate) fn str_arg<'a>(
    args: &'a [ArgValue],
    index: usize,
    name: &str,
) -> Result<&'a str, ChatError> {
    args.get(index)
        .and_then(ArgValue::as_str)
        .ok_or_else(|| ChatError::InvalidArguments(format!("missing or non-string `{name}`")))
}

/// Fetch an optional string argument, falling back to a default.
pub(crate) fn opt_str_arg<'a>(
    args: &'a [ArgValue],
    index: usize,
    name: &str,
    default: &'a str,
) -> Result<&'a str, ChatError> {
    match args.get(index) {
        None => Ok(default),
        Some(value) => value
            .as_str()
            .ok_or_else(|| ChatError::InvalidArguments(format!("`{name}` must be a string"))),
    }
}

/// Fetch an optional positive integer argument.
pub(crate) fn opt_u32_arg(
    args: &[ArgValue],
    index: usize,
    name: &str,
    default: u32,
) -> Result<u32, ChatError> {
    match args.get(index) {
        None => Ok(default),
        Some(value) => value
            .as_int()
            .and_then(|i| u32::try_from(i).ok())
            .filter(|i| *i > 0)
            .ok_or_else(|| {
                ChatError::InvalidArguments(format!("`{name}` must be a positive integer"))
            }),
    }
}
