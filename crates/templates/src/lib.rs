//! Poster-template service: REST metadata/search client and the
//! browser-driven render flow with indexed text edits.

pub mod api;
pub mod error;
pub mod objects;
pub mod render;

pub use {
    api::{SIZE_OPTIONS, Template, TemplateClient, TemplateKind},
    error::{Result, TemplateError},
    render::TemplateRenderer,
};
