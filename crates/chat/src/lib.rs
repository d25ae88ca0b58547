//! Chat command layer: argument parsing, command routing, and the
//! outbound reply model.
//!
//! Message delivery itself belongs to the embedding chat platform; the
//! only interface outward is [`ReplySink`]. Inbound, one text line is
//! matched against the registered command aliases (longest match wins),
//! its remainder parsed into typed arguments, and the handler run behind
//! an error boundary that turns every failure into an error reply — a
//! single command can never take the process down.

pub mod commands;
pub mod error;
pub mod help;
pub mod parse;
pub mod reply;
pub mod router;
pub mod services;

pub use {
    error::ChatError,
    parse::{ArgValue, parse_args},
    reply::{Attachment, Embed, Reply, ReplySink},
    router::{Command, Router},
    services::Services,
};
