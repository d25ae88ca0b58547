//! Browser-driven template rendering.
//!
//! The editor page renders onto a canvas whose library keeps the live
//! object graph out of reach. A hook injected after navigation wraps the
//! library's render entry point and stashes the canvas object on a window
//! global; the page is then nudged to re-render (a Ctrl-zoom gesture)
//! until the stashed object answers `toJSON()`, within a bounded poll.
//! Edits index into the object graph and invoke its text setter.

use std::{sync::Arc, time::Duration};

use {
    serde_json::Value,
    tracing::{debug, info, warn},
    wortbot_browser::{
        BrowserError, BrowserPool, Page, Presence, Viewport,
        retry::{self, PollPolicy},
        script,
    },
    wortbot_cache::ResultCache,
    wortbot_media::image_ops::{self, Region},
};

use crate::{
    api::{Template, TemplateClient, TemplateKind},
    error::Result,
};

/// Wraps the canvas library's `renderAll` so the next render stashes the
/// live canvas object on the window.
const RENDER_HOOK_JS: &str = r#"
(() => {
    const hooked = function () {
        window.__liveCanvas = this;
        this.__renderAllBase();
    };
    fabric.Canvas.prototype.__renderAllBase = fabric.Canvas.prototype.renderAll;
    fabric.Canvas.prototype.renderAll = hooked;
    return true;
})()
"#;

const CONSENT_SELECTOR: &str = "#user-consent-form > div:nth-of-type(2) > div:nth-of-type(2) > a";
const VIDEO_PAUSE_SELECTOR: &str = "#seekbar-view > button:nth-of-type(2)";
const ZOOM_INDICATOR_SELECTOR: &str = "#poster-nav-view > div";
const WHITEBOARD_SELECTOR: &str = "#whiteboard";

/// Page zoom used for render captures, for pixel density.
const CAPTURE_ZOOM: f64 = 4.0;

/// Hard bound on zoom-adjustment steps.
const MAX_ZOOM_STEPS: u32 = 24;

/// Settings for the scripted flow.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Settle delay after navigation, before the hook is injected.
    pub settle: Duration,
    /// Bounded attempts when polling for the live canvas object.
    pub poll_attempts: u32,
    /// Fixed delay between poll attempts.
    pub poll_delay: Duration,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(5),
            poll_attempts: 20,
            poll_delay: Duration::from_secs(2),
        }
    }
}

/// Renders templates through a leased browser session, cache-fronted.
pub struct TemplateRenderer {
    pool: Arc<BrowserPool>,
    cache: ResultCache,
    settings: RenderSettings,
}

impl TemplateRenderer {
    pub fn new(pool: Arc<BrowserPool>, cache: ResultCache, settings: RenderSettings) -> Self {
        Self {
            pool,
            cache,
            settings,
        }
    }

    /// The template's object graph, from cache or a live editor session.
    pub async fn object_graph(&self, template: &Template) -> Result<Value> {
        let key = ("objects", &template.id);
        if let Some(raw) = self.cache.get(&key).await? {
            return Ok(serde_json::from_slice(&raw)?);
        }

        let customize_url = template.customize_url.clone();
        let graph: Value = self
            .pool
            .run_function(Viewport::default(), 1.0, |page| async move {
                prepare(&page, &customize_url, &self.settings).await
            })
            .await?;

        self.cache.save(&key, &serde_json::to_vec(&graph)?).await?;
        Ok(graph)
    }

    /// Render the template with the given (index path, text) edits
    /// applied, returning PNG bytes.
    pub async fn render(
        &self,
        template: &Template,
        edits: &[(Vec<usize>, String)],
    ) -> Result<Vec<u8>> {
        let key = ("modify", &template.id, edits);
        if let Some(bytes) = self.cache.get(&key).await? {
            return Ok(bytes);
        }

        let customize_url = template.customize_url.clone();
        let (png, bounds) = self
            .pool
            .run_function(Viewport::default(), CAPTURE_ZOOM, |page| async move {
                prepare(&page, &customize_url, &self.settings).await?;
                apply_edits(&page, edits).await?;
                refresh_view(&page).await?;

                zoom_to(&page, 100).await?;
                let bounds = script::element_bounds(&page, WHITEBOARD_SELECTOR).await?;
                let png = script::full_screenshot(&page).await?;
                Ok::<_, crate::TemplateError>((png, bounds))
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
            CAPTURE_ZOOM,
            0,
        )?;
        let bytes = image_ops::encode_png(&cropped)?;

        self.cache.save(&key, &bytes).await?;
        info!(template_id = %template.id, edits = edits.len(), "rendered template");
        Ok(bytes)
    }

    /// A template's preview bytes, cached after the first download.
    /// Video templates have no still preview; those are rendered instead.
    pub async fn preview(&self, client: &TemplateClient, template: &Template) -> Result<Vec<u8>> {
        match template.kind {
            TemplateKind::Image => {
                let key = ("preview", &template.id);
                if let Some(bytes) = self.cache.get(&key).await? {
                    return Ok(bytes);
                }
                let bytes = client.download(&template.preview_url).await?;
                self.cache.save(&key, &bytes).await?;
                Ok(bytes)
            },
            TemplateKind::Video => self.render(template, &[]).await,
        }
    }
}

/// Navigate to the editor and obtain the live canvas object.
///
/// Absent consent/pause controls are tolerated; exhausting the poll
/// budget without a queryable canvas object is fatal, carrying the final
/// probe failure.
async fn prepare(
    page: &Page,
    url: &str,
    settings: &RenderSettings,
) -> std::result::Result<Value, BrowserError> {
    script::navigate(page, url).await?;

    // Let the editor boot before poking at it.
    tokio::time::sleep(settings.settle).await;

    if script::click(page, CONSENT_SELECTOR, Presence::Optional).await? {
        debug!("dismissed consent dialog");
    }
    if script::click(page, VIDEO_PAUSE_SELECTOR, Presence::Optional).await? {
        debug!("paused template video");
    }

    script::eval::<bool>(page, RENDER_HOOK_JS).await?;
    refresh_view(page).await?;

    let policy = PollPolicy::new(settings.poll_attempts, settings.poll_delay);
    retry::poll(policy, |attempt| async move {
        if attempt > 1 {
            refresh_view(page).await?;
        }
        probe_canvas(page).await
    })
    .await
    .map_err(|e| BrowserError::PollExhausted {
        attempts: e.attempts,
        last: e.last.to_string(),
    })
}

/// Ask the stashed canvas object for its JSON form. Fails while the hook
/// has not fired yet.
async fn probe_canvas(page: &Page) -> std::result::Result<Value, BrowserError> {
    script::eval(page, "window.__liveCanvas.toJSON()").await
}

/// Nudge the editor into re-rendering: zoom out, wait, zoom back in.
async fn refresh_view(page: &Page) -> std::result::Result<(), BrowserError> {
    script::ctrl_key_chord(page, '-').await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    script::ctrl_key_chord(page, '+').await
}

/// Apply (index path, text) edits through the canvas object's text setter.
async fn apply_edits(
    page: &Page,
    edits: &[(Vec<usize>, String)],
) -> std::result::Result<(), BrowserError> {
    for (path, text) in edits {
        let accessor: String = path.iter().map(|i| format!("._objects[{i}]")).collect();
        // Comma expression: setText returns the (cyclic) canvas object,
        // which must not travel back over CDP.
        let js = format!(
            "(window.__liveCanvas{accessor}.setText({}), true)",
            serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string()),
        );
        debug!(?path, "applying text edit");
        script::eval::<bool>(page, &js).await?;
    }
    Ok(())
}

/// Drive the editor's zoom control toward `target` percent with Ctrl-zoom
/// steps, reading the page's zoom indicator between steps. Stops at the
/// target, when the delta stops shrinking, or after a bounded number of
/// steps.
async fn zoom_to(page: &Page, target: i64) -> std::result::Result<i64, BrowserError> {
    let mut best_delta = i64::MAX;
    let mut current = read_zoom_percent(page).await?;

    for _ in 0..MAX_ZOOM_STEPS {
        let delta = target - current;
        if delta == 0 {
            return Ok(current);
        }
        if delta.abs() >= best_delta {
            warn!(current, target, "zoom stopped improving");
            return Ok(current);
        }
        best_delta = delta.abs();

        script::ctrl_key_chord(page, if delta > 0 { '+' } else { '-' }).await?;
        current = read_zoom_percent(page).await?;
    }

    warn!(current, target, "zoom step budget spent");
    Ok(current)
}

async fn read_zoom_percent(page: &Page) -> std::result::Result<i64, BrowserError> {
    let js = format!(
        r"(() => {{
            const el = document.querySelector({});
            if (!el) return null;
            const v = parseInt(el.innerHTML);
            return isNaN(v) ? null : v;
        }})()",
        serde_json::to_string(ZOOM_INDICATOR_SELECTOR).unwrap_or_else(|_| "\"\"".to_string()),
    );

    let value: Option<i64> = script::eval(page, &js).await?;
    value.ok_or_else(|| BrowserError::ElementMissing {
        selector: ZOOM_INDICATOR_SELECTOR.to_string(),
        step: "read zoom indicator".to_string(),
    })
}
