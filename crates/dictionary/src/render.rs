//! The entry-card render flow.
//!
//! A search page's dictionary widget is repurposed as the card layout:
//! navigate, dismiss the consent dialog if present, locate the entry
//! container (fatal if the page structure changed), overwrite its text
//! fields with the requested entry (missing fields are skipped), then
//! magnify, capture, crop to the container, and trim the trailing
//! whitespace. Results are content-addressed by the request tuple.

use std::sync::Arc;

use {
    serde::Serialize,
    tracing::{debug, info},
    wortbot_browser::{BrowserPool, Presence, Viewport, script},
    wortbot_cache::ResultCache,
    wortbot_media::image_ops::{self, BACKGROUND, Region},
};

use crate::{error::Result, word::Word};

/// Consent button shown on first visit.
const CONSENT_SELECTOR: &str = "#L2AGLb";

/// The dictionary widget: third child of the results container. Fatal if
/// absent, the page structure is the whole basis of the card.
const CONTAINER_SELECTOR: &str = ".lr_container > *:nth-child(3)";

/// Text fields inside the container, relative child paths. Each is
/// optional: a missing one is logged and skipped, partial cards are
/// accepted.
const FIELD_SELECTORS: [(&str, &str); 5] = [
    ("word", "> div > div:nth-of-type(2) > div:nth-of-type(1) > div > span"),
    ("ipa", "> div > div:nth-of-type(2) > div:nth-of-type(2) > span > span"),
    (
        "part of speech",
        "> div > div:nth-of-type(4) > div > div > div > div > div > i > span",
    ),
    (
        "meaning",
        "> div > div:nth-of-type(4) > div > div > ol > li:nth-of-type(1) > div > div \
         > div:nth-of-type(1) > div:nth-of-type(2) > div > div:nth-of-type(1) > span",
    ),
    (
        "example",
        "> div > div:nth-of-type(4) > div > div > ol > li:nth-of-type(1) > div > div \
         > div:nth-of-type(1) > div:nth-of-type(2) > div > div:nth-of-type(2) > div",
    ),
];

/// Padding per unit of magnification, in pixels.
const PAD_PER_ZOOM: u32 = 5;

/// Logical parameters of one entry-card render; doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryCardRequest {
    pub word: String,
    pub ipa: String,
    pub part_of_speech: String,
    pub meaning: String,
    pub example: String,
    pub zoom: u32,
}

impl EntryCardRequest {
    pub fn from_word(word: &Word, zoom: u32) -> Self {
        Self {
            word: word.display_name(),
            ipa: word.ipa.clone(),
            part_of_speech: word.part_of_speech.clone(),
            meaning: word.meaning.clone(),
            example: word.example.clone(),
            zoom,
        }
    }
}

/// Cache-fronted renderer for dictionary entry cards.
pub struct EntryCardRenderer {
    pool: Arc<BrowserPool>,
    cache: ResultCache,
    page_url: String,
}

impl EntryCardRenderer {
    pub fn new(pool: Arc<BrowserPool>, cache: ResultCache, page_url: impl Into<String>) -> Self {
        Self {
            pool,
            cache,
            page_url: page_url.into(),
        }
    }

    /// Render the entry card as PNG bytes, consulting the cache first.
    pub async fn render(&self, request: &EntryCardRequest) -> Result<Vec<u8>> {
        let key = (
            "entry-card",
            &request.word,
            &request.ipa,
            &request.part_of_speech,
            &request.meaning,
            &request.example,
            request.zoom,
        );
        if let Some(bytes) = self.cache.get(&key).await? {
            debug!(word = %request.word, "entry card served from cache");
            return Ok(bytes);
        }

        let zoom = f64::from(request.zoom.max(1));
        let pad = PAD_PER_ZOOM * request.zoom.max(1);

        let (png, bounds) = self
            .pool
            .run_function(Viewport::default(), 1.0, |page| async move {
                script::navigate(&page, &self.page_url).await?;
                script::click(&page, CONSENT_SELECTOR, Presence::Optional).await?;
                script::require(&page, CONTAINER_SELECTOR, "locate entry container").await?;

                for (field, child) in FIELD_SELECTORS {
                    let selector = format!("{CONTAINER_SELECTOR} {child}");
                    let value = match field {
                        "word" => request.word.clone(),
                        "ipa" => request.ipa.clone(),
                        "part of speech" => request.part_of_speech.clone(),
                        "meaning" => request.meaning.clone(),
                        // The example reads as a quotation on the card.
                        _ => format!("\"{}\"", request.example),
                    };
                    script::set_inner_text(&page, &selector, &value, Presence::Optional).await?;
                }

                script::configure_viewport(
                    &page,
                    Viewport::default().scaled(request.zoom.max(1)),
                    1.0,
                )
                .await?;
                script::set_page_zoom(&page, zoom).await?;
                script::scroll_into_view(&page, CONTAINER_SELECTOR).await?;

                let bounds = script::element_bounds(&page, CONTAINER_SELECTOR).await?;
                let png = script::full_screenshot(&page).await?;
                Ok::<_, crate::DictionaryError>((png, bounds))
            })
            .await?;

        let img = image_ops::decode(&png)?;
        let cropped = image_ops::crop_region(
            &img,
            Region {
                x: bounds.x,
                y: bounds.y,
                width: bounds.width,
                height: bounds.height,
            },
            zoom,
            pad,
        )?;
        let trimmed = image_ops::trim_trailing(&cropped, BACKGROUND, pad)?;
        let bytes = image_ops::encode_png(&trimmed)?;

        self.cache.save(&key, &bytes).await?;
        info!(word = %request.word, bytes = bytes.len(), "rendered entry card");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_key_includes_every_parameter() {
        let a = EntryCardRequest {
            word: "lauf".into(),
            ipa: "laʊf".into(),
            part_of_speech: "Verb".into(),
            meaning: "to run".into(),
            example: "Ich laufe schnell.".into(),
            zoom: 3,
        };
        let mut b = a.clone();
        b.zoom = 4;

        let ha = ResultCache::key_hash(&a).ok();
        let hb = ResultCache::key_hash(&b).ok();
        assert!(ha.is_some());
        assert_ne!(ha, hb);
    }
}
