//! Config schema. Every section and field has a serde default so partial
//! files load cleanly.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WortbotConfig {
    pub browser: BrowserSettings,
    pub cache: CacheSettings,
    pub dictionary: DictionarySettings,
    pub entry_card: EntryCardSettings,
    pub phonetics: PhoneticsSettings,
    pub quote: QuoteSettings,
    pub templates: TemplateSettings,
}

/// Headless-browser pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Number of browser sessions the pool launches at startup.
    pub pool_size: usize,
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Base viewport width before magnification.
    pub viewport_width: u32,
    /// Base viewport height before magnification.
    pub viewport_height: u32,
    /// Device scale factor for HiDPI captures.
    pub device_scale_factor: f64,
    /// Navigation/request timeout in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            pool_size: 2,
            chrome_path: None,
            headless: true,
            viewport_width: 1600,
            viewport_height: 900,
            device_scale_factor: 1.0,
            navigation_timeout_ms: 30_000,
            chrome_args: Vec::new(),
        }
    }
}

/// Content-addressed result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Directory holding the cached blobs.
    pub dir: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: "cache".into(),
        }
    }
}

/// Persisted dictionary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionarySettings {
    /// Directory holding the dictionary files.
    pub dir: String,
    /// Name of the dictionary loaded at startup.
    pub name: String,
}

impl Default for DictionarySettings {
    fn default() -> Self {
        Self {
            dir: "dictionaries".into(),
            name: "global".into(),
        }
    }
}

/// Dictionary entry-card rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryCardSettings {
    /// Page whose dictionary widget is repurposed for rendering.
    pub page_url: String,
    /// Default magnification factor.
    pub default_zoom: u32,
}

impl Default for EntryCardSettings {
    fn default() -> Self {
        Self {
            page_url: "https://www.google.de/search?q=laufen+definition".into(),
            default_zoom: 3,
        }
    }
}

/// Grapheme-to-phoneme web service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneticsSettings {
    /// Transcription service endpoint.
    pub endpoint: String,
}

impl Default for PhoneticsSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://clarin.phonetik.uni-muenchen.de/BASWebServices/services/runG2P"
                .into(),
        }
    }
}

/// Quote-card settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSettings {
    /// Base URL of the random background image service.
    pub background_url: String,
    pub width: u32,
    pub height: u32,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            background_url: "https://picsum.photos".into(),
            width: 1600,
            height: 900,
        }
    }
}

/// Poster-template service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// REST API base URL.
    pub api_url: String,
    /// Client identifier sent with every API request.
    pub client_id: String,
    /// Settle delay after navigating to the editor, in seconds.
    pub settle_secs: u64,
    /// Bounded attempts when polling for the live render object.
    pub poll_attempts: u32,
    /// Fixed delay between poll attempts, in seconds.
    pub poll_delay_secs: u64,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.postermywall.com/v1".into(),
            client_id: String::new(),
            settle_secs: 5,
            poll_attempts: 20,
            poll_delay_secs: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let cfg = WortbotConfig::default();
        assert_eq!(cfg.browser.pool_size, 2);
        assert!(cfg.browser.headless);
        assert_eq!(cfg.entry_card.default_zoom, 3);
        assert_eq!(cfg.templates.poll_attempts, 20);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: WortbotConfig = toml::from_str(
            r#"
            [browser]
            pool_size = 5
            "#,
        )
        .unwrap_or_default();
        assert_eq!(cfg.browser.pool_size, 5);
        assert_eq!(cfg.browser.viewport_width, 1600);
        assert_eq!(cfg.cache.dir, "cache");
    }
}
