//! Pool configuration and shared automation types.

use serde::{Deserialize, Serialize};

/// Browser pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserPoolConfig {
    /// Number of sessions launched eagerly at pool construction.
    pub pool_size: usize,
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub chrome_path: Option<String>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// Default viewport before a flow reconfigures it.
    pub viewport: Viewport,
    /// Device scale factor for HiDPI captures.
    pub device_scale_factor: f64,
    /// Navigation/request timeout in milliseconds.
    pub navigation_timeout_ms: u64,
    /// Additional Chrome arguments.
    pub chrome_args: Vec<String>,
}

impl Default for BrowserPoolConfig {
    fn default() -> Self {
        Self {
            pool_size: 2,
            chrome_path: None,
            headless: true,
            viewport: Viewport::default(),
            device_scale_factor: 1.0,
            navigation_timeout_ms: 30_000,
            chrome_args: Vec::new(),
        }
    }
}

impl From<&wortbot_config::schema::BrowserSettings> for BrowserPoolConfig {
    fn from(cfg: &wortbot_config::schema::BrowserSettings) -> Self {
        Self {
            pool_size: cfg.pool_size,
            chrome_path: cfg.chrome_path.clone(),
            headless: cfg.headless,
            viewport: Viewport {
                width: cfg.viewport_width,
                height: cfg.viewport_height,
            },
            device_scale_factor: cfg.device_scale_factor,
            navigation_timeout_ms: cfg.navigation_timeout_ms,
            chrome_args: cfg.chrome_args.clone(),
        }
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
        }
    }
}

impl Viewport {
    /// Scale both dimensions by a magnification factor.
    #[must_use]
    pub fn scaled(self, factor: u32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Bounding box of a page element, in CSS pixels relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Whether a step tolerates the absence of its target element.
///
/// `Optional` lookups report absence as `Ok(None)` (logged, skipped);
/// `Required` lookups turn absence into a fatal
/// [`BrowserError::ElementMissing`](crate::BrowserError::ElementMissing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_scaling() {
        let v = Viewport::default().scaled(3);
        assert_eq!(v.width, 4800);
        assert_eq!(v.height, 2700);
    }
}
