//! Quote-card composition.
//!
//! Fetches a random background, wraps the quote into lines that fit the
//! card, and picks a text color that contrasts with the background. The
//! actual glyph drawing is behind [`TextCompositor`] — font files and
//! rasterization are owned by the embedding application.

use {
    image::{DynamicImage, GenericImageView, imageops::FilterType},
    rand::Rng,
    tracing::debug,
};

use crate::{
    error::Result,
    image_ops::{decode, encode_png},
};

/// Horizontal margin kept free of text on both card edges combined.
const TEXT_MARGIN: u32 = 200;

/// Random font-size range for the quote text.
const FONT_SIZE_RANGE: std::ops::RangeInclusive<u32> = 80..=150;

/// Measures rendered line widths for a given font size.
pub trait TextMeasurer: Send + Sync {
    fn line_width(&self, text: &str, font_size: u32) -> u32;
}

/// Draws a laid-out quote onto a background.
pub trait TextCompositor: Send + Sync {
    fn draw(&self, background: DynamicImage, layout: &QuoteLayout) -> Result<DynamicImage>;
}

/// Finished layout handed to the compositor.
#[derive(Debug, Clone)]
pub struct QuoteLayout {
    /// Wrapped quote lines, author attribution last.
    pub lines: Vec<String>,
    /// Anchor of the text block (centered horizontally).
    pub origin: (u32, u32),
    pub font_size: u32,
    pub color: [u8; 3],
    /// Outline color, the inverse of `color`.
    pub stroke: [u8; 3],
}

/// Quote-card settings.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Base URL of the sized random-image service.
    pub background_url: String,
    pub width: u32,
    pub height: u32,
}

/// Greedily wrap `text` into lines no wider than `max_width`.
///
/// A word that alone exceeds the limit still gets its own line; wrapping
/// never drops content.
pub fn wrap_lines(
    text: &str,
    measurer: &dyn TextMeasurer,
    font_size: u32,
    max_width: u32,
) -> Vec<String> {
    let mut lines: Vec<String> = vec![String::new()];
    for word in text.split(' ') {
        let last = lines.len() - 1;
        let candidate = if lines[last].is_empty() {
            word.to_string()
        } else {
            format!("{} {}", lines[last], word)
        };

        if !lines[last].is_empty() && measurer.line_width(&candidate, font_size) > max_width {
            lines.push(word.to_string());
        } else {
            lines[last] = candidate;
        }
    }
    lines
}

/// Pick black or white depending on the background's average luminance.
///
/// The average is the image resized to a single pixel; dark backgrounds
/// get white text.
pub fn contrast_color(background: &DynamicImage) -> [u8; 3] {
    let avg = background
        .resize_exact(1, 1, FilterType::Triangle)
        .to_rgb8();
    let p = avg.get_pixel(0, 0);
    let sum = u32::from(p[0]) + u32::from(p[1]) + u32::from(p[2]);
    if sum < 128 * 3 {
        [255, 255, 255]
    } else {
        [0, 0, 0]
    }
}

/// Compose a quote card from already-fetched background bytes.
pub fn compose(
    background: &[u8],
    text: &str,
    author: &str,
    font_size: u32,
    measurer: &dyn TextMeasurer,
    compositor: &dyn TextCompositor,
) -> Result<Vec<u8>> {
    let background = decode(background)?;
    let (width, _) = background.dimensions();

    let max_width = width.saturating_sub(TEXT_MARGIN);
    let mut lines = wrap_lines(text, measurer, font_size, max_width);
    lines.push(format!("- {author}"));

    let color = contrast_color(&background);
    let stroke = [255 - color[0], 255 - color[1], 255 - color[2]];

    let layout = QuoteLayout {
        lines,
        origin: (width / 2, 100),
        font_size,
        color,
        stroke,
    };

    debug!(lines = layout.lines.len(), font_size, "composing quote card");
    let card = compositor.draw(background, &layout)?;
    encode_png(&card)
}

/// Quote-card renderer fetching backgrounds over HTTP.
pub struct QuoteRenderer {
    http: reqwest::Client,
    config: QuoteConfig,
}

impl QuoteRenderer {
    pub fn new(http: reqwest::Client, config: QuoteConfig) -> Self {
        Self { http, config }
    }

    /// Fetch a random background image, optionally blurred. `None` picks
    /// a random blur strength (0 disables the query parameter).
    pub async fn fetch_background(&self, blur: Option<u8>) -> Result<Vec<u8>> {
        let blur = blur.unwrap_or_else(|| rand::rng().random_range(0..=3));
        let mut url = format!(
            "{}/{}/{}.jpg",
            self.config.background_url, self.config.width, self.config.height
        );
        if blur > 0 {
            url.push_str(&format!("?blur={blur}"));
        }

        debug!(url, "fetching quote background");
        let bytes = self.http.get(&url).send().await?.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Fetch a background and compose the card.
    pub async fn render(
        &self,
        text: &str,
        author: &str,
        measurer: &dyn TextMeasurer,
        compositor: &dyn TextCompositor,
    ) -> Result<Vec<u8>> {
        let background = self.fetch_background(None).await?;
        let font_size = rand::rng().random_range(FONT_SIZE_RANGE);
        compose(&background, text, author, font_size, measurer, compositor)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    /// Width proportional to character count, like a monospace face.
    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn line_width(&self, text: &str, font_size: u32) -> u32 {
            text.chars().count() as u32 * font_size / 2
        }
    }

    /// Draws nothing; returns the background untouched.
    struct NoopCompositor;

    impl TextCompositor for NoopCompositor {
        fn draw(&self, background: DynamicImage, _layout: &QuoteLayout) -> Result<DynamicImage> {
            Ok(background)
        }
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        let lines = wrap_lines("kurz und gut", &FixedWidth, 10, 1000);
        assert_eq!(lines, vec!["kurz und gut"]);
    }

    #[test]
    fn wrap_breaks_at_width_and_keeps_all_words() {
        let text = "Trapdoors und Repeater sind eigentlich das gleiche";
        let lines = wrap_lines(text, &FixedWidth, 10, 100);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            // A single overlong word may exceed the limit; joined lines may not.
            assert!(line.split(' ').count() == 1 || FixedWidth.line_width(line, 10) <= 100);
        }
    }

    #[test]
    fn contrast_picks_white_on_dark_and_black_on_light() {
        let dark = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([20, 20, 20])));
        let light = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([240, 240, 240])));
        assert_eq!(contrast_color(&dark), [255, 255, 255]);
        assert_eq!(contrast_color(&light), [0, 0, 0]);
    }

    #[test]
    fn compose_appends_author_and_encodes_png() {
        let background = {
            let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 300, Rgb([10, 10, 10])));
            encode_png(&img).unwrap()
        };

        struct CheckingCompositor;
        impl TextCompositor for CheckingCompositor {
            fn draw(&self, background: DynamicImage, layout: &QuoteLayout) -> Result<DynamicImage> {
                assert_eq!(layout.lines.last().map(String::as_str), Some("- Zwakel"));
                assert_eq!(layout.color, [255, 255, 255]);
                assert_eq!(layout.stroke, [0, 0, 0]);
                assert_eq!(layout.origin, (200, 100));
                Ok(background)
            }
        }

        let png = compose(
            &background,
            "pure inspiration",
            "Zwakel",
            90,
            &FixedWidth,
            &CheckingCompositor,
        )
        .unwrap();
        assert!(decode(&png).is_ok());
    }
}
