//! Minimal text measurement and composition stand-ins.
//!
//! Real glyph rasterization needs a font stack, which the chat host owns.
//! The CLI ships a width heuristic good enough for line wrapping and a
//! compositor that leaves the background untouched.

use wortbot_media::{
    Result,
    quote::{QuoteLayout, TextCompositor, TextMeasurer},
};

/// Approximates proportional glyph widths as 0.6 em per character.
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn line_width(&self, text: &str, font_size: u32) -> u32 {
        text.chars().count() as u32 * font_size * 6 / 10
    }
}

/// Returns the background unchanged; the layout is only logged.
pub struct PassthroughCompositor;

impl TextCompositor for PassthroughCompositor {
    fn draw(
        &self,
        background: image::DynamicImage,
        layout: &QuoteLayout,
    ) -> Result<image::DynamicImage> {
        tracing::info!(
            lines = layout.lines.len(),
            font_size = layout.font_size,
            "no font stack available, emitting bare background"
        );
        Ok(background)
    }
}
