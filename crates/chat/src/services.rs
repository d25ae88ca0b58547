//! Aggregated service handles the command handlers run against.

use std::sync::Arc;

use {
    tokio::sync::Mutex,
    wortbot_dictionary::{Dictionary, EntryCardRenderer},
    wortbot_media::quote::{QuoteRenderer, TextCompositor, TextMeasurer},
    wortbot_phonetics::PhoneticsClient,
    wortbot_templates::{TemplateClient, TemplateRenderer},
};

/// Everything a command handler may need. Built once at startup by the
/// embedding application.
pub struct Services {
    /// The persisted dictionary; mutations rewrite its file.
    pub dictionary: Mutex<Dictionary>,
    pub entry_cards: EntryCardRenderer,
    pub phonetics: PhoneticsClient,
    pub templates: TemplateClient,
    pub template_renderer: TemplateRenderer,
    pub quotes: QuoteRenderer,
    /// Text measurement and glyph drawing are provided by the host.
    pub measurer: Arc<dyn TextMeasurer>,
    pub compositor: Arc<dyn TextCompositor>,
    /// Default magnification for entry cards.
    pub default_zoom: u32,
}
