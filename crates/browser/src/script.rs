//! Typed scripted-interaction steps against one leased page.
//!
//! Each step kind is an explicit function with typed parameters instead of
//! control flow embedded in string-built scripts. Element text and
//! selectors are JSON-escaped before they reach the page, so user input
//! never breaks out of the injected JavaScript.

use {
    chromiumoxide::{
        Page,
        cdp::browser_protocol::{
            emulation::SetDeviceMetricsOverrideParams,
            input::{DispatchKeyEventParams, DispatchKeyEventType},
            page::CaptureScreenshotFormat,
        },
    },
    tracing::{debug, warn},
};

use crate::{
    error::BrowserError,
    types::{ElementBounds, Presence, Viewport},
};

/// Modifier bitmask for Control in CDP key events.
const MODIFIER_CTRL: i64 = 2;

/// Navigate to a URL and wait for the load to settle.
pub async fn navigate(page: &Page, url: &str) -> Result<(), BrowserError> {
    validate_url(url)?;

    page.goto(url)
        .await
        .map_err(|e| BrowserError::NavigationFailed(e.to_string()))?;
    let _ = page.wait_for_navigation().await;

    debug!(url, "navigated");
    Ok(())
}

/// Whether an element matching `selector` is present.
pub async fn exists(page: &Page, selector: &str) -> Result<bool, BrowserError> {
    let js = format!("document.querySelector({}) !== null", js_str(selector));
    eval_bool(page, &js).await
}

/// Fail unless `selector` is present. Used for the structural container a
/// flow cannot proceed without.
pub async fn require(page: &Page, selector: &str, step: &str) -> Result<(), BrowserError> {
    if exists(page, selector).await? {
        Ok(())
    } else {
        Err(BrowserError::ElementMissing {
            selector: selector.to_string(),
            step: step.to_string(),
        })
    }
}

/// Click an element. Returns whether a click happened.
///
/// With `Presence::Optional`, a missing or non-clickable element is logged
/// and tolerated (consent dialogs that were already dismissed).
pub async fn click(
    page: &Page,
    selector: &str,
    presence: Presence,
) -> Result<bool, BrowserError> {
    if !exists(page, selector).await? {
        return match presence {
            Presence::Optional => {
                debug!(selector, "optional element absent, skipping click");
                Ok(false)
            },
            Presence::Required => Err(BrowserError::ElementMissing {
                selector: selector.to_string(),
                step: "click".to_string(),
            }),
        };
    }

    let element = match page.find_element(selector).await {
        Ok(el) => el,
        Err(e) if presence == Presence::Optional => {
            warn!(selector, error = %e, "optional element lookup failed, skipping click");
            return Ok(false);
        },
        Err(e) => return Err(BrowserError::Cdp(e.to_string())),
    };

    match element.click().await {
        Ok(_) => Ok(true),
        Err(e) if presence == Presence::Optional => {
            warn!(selector, error = %e, "optional element not clickable, skipping");
            Ok(false)
        },
        Err(e) => Err(BrowserError::Cdp(e.to_string())),
    }
}

/// Overwrite an element's text content. Returns whether the element was
/// found; a missing `Optional` element is logged and skipped (partial
/// rendering accepted).
pub async fn set_inner_text(
    page: &Page,
    selector: &str,
    text: &str,
    presence: Presence,
) -> Result<bool, BrowserError> {
    let js = format!(
        r"(() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            el.innerText = {text};
            return true;
        }})()",
        sel = js_str(selector),
        text = js_str(text),
    );

    let found = eval_bool(page, &js).await?;
    if !found {
        match presence {
            Presence::Optional => {
                warn!(selector, "field element absent, leaving placeholder text");
            },
            Presence::Required => {
                return Err(BrowserError::ElementMissing {
                    selector: selector.to_string(),
                    step: "set text".to_string(),
                });
            },
        }
    }
    Ok(found)
}

/// Bounding box of an element in page coordinates.
pub async fn element_bounds(page: &Page, selector: &str) -> Result<ElementBounds, BrowserError> {
    let js = format!(
        r"(() => {{
            const el = document.querySelector({sel});
            if (!el) return null;
            const r = el.getBoundingClientRect();
            return {{
                x: r.x + window.scrollX,
                y: r.y + window.scrollY,
                width: r.width,
                height: r.height
            }};
        }})()",
        sel = js_str(selector),
    );

    let bounds: Option<ElementBounds> = eval(page, &js).await?;
    bounds.ok_or_else(|| BrowserError::ElementMissing {
        selector: selector.to_string(),
        step: "measure bounds".to_string(),
    })
}

/// Scroll an element into the visible capture area.
pub async fn scroll_into_view(page: &Page, selector: &str) -> Result<(), BrowserError> {
    let js = format!(
        r"(() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            el.scrollIntoView(true);
            return true;
        }})()",
        sel = js_str(selector),
    );

    if eval_bool(page, &js).await? {
        Ok(())
    } else {
        Err(BrowserError::ElementMissing {
            selector: selector.to_string(),
            step: "scroll into view".to_string(),
        })
    }
}

/// Override the viewport dimensions so the capture has enough pixels.
pub async fn configure_viewport(
    page: &Page,
    viewport: Viewport,
    device_scale_factor: f64,
) -> Result<(), BrowserError> {
    let cmd = SetDeviceMetricsOverrideParams::builder()
        .width(viewport.width as i64)
        .height(viewport.height as i64)
        .device_scale_factor(device_scale_factor)
        .mobile(false)
        .build()
        .map_err(BrowserError::Cdp)?;

    page.execute(cmd)
        .await
        .map_err(|e| BrowserError::Cdp(e.to_string()))?;

    debug!(
        width = viewport.width,
        height = viewport.height,
        "configured viewport"
    );
    Ok(())
}

/// Set the page's CSS zoom multiplier.
pub async fn set_page_zoom(page: &Page, factor: f64) -> Result<(), BrowserError> {
    let js = format!("document.body.style.zoom = '{factor}'");
    page.evaluate(js.as_str())
        .await
        .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?;
    Ok(())
}

/// Capture a full-page PNG screenshot.
pub async fn full_screenshot(page: &Page) -> Result<Vec<u8>, BrowserError> {
    page.screenshot(
        chromiumoxide::page::ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build(),
    )
    .await
    .map_err(|e| BrowserError::ScreenshotFailed(e.to_string()))
}

/// Dispatch a Ctrl+key chord (the zoom-gesture refresh trick).
pub async fn ctrl_key_chord(page: &Page, key: char) -> Result<(), BrowserError> {
    for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
        let cmd = DispatchKeyEventParams::builder()
            .r#type(event_type)
            .modifiers(MODIFIER_CTRL)
            .text(key.to_string())
            .key(key.to_string())
            .build()
            .map_err(BrowserError::Cdp)?;
        page.execute(cmd)
            .await
            .map_err(|e| BrowserError::Cdp(e.to_string()))?;
    }
    Ok(())
}

/// Evaluate JavaScript and deserialize its result.
pub async fn eval<T: serde::de::DeserializeOwned>(
    page: &Page,
    js: &str,
) -> Result<T, BrowserError> {
    page.evaluate(js)
        .await
        .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))?
        .into_value()
        .map_err(|e| BrowserError::JsEvalFailed(e.to_string()))
}

async fn eval_bool(page: &Page, js: &str) -> Result<bool, BrowserError> {
    eval(page, js).await
}

/// Render a Rust string as a JavaScript string literal.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

fn validate_url(url: &str) -> Result<(), BrowserError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationFailed(format!("invalid URL '{url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BrowserError::NavigationFailed(format!(
            "unsupported URL scheme '{scheme}', only http/https allowed"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_str_escapes_quotes_and_newlines() {
        assert_eq!(js_str(r#"a"b"#), r#""a\"b""#);
        assert_eq!(js_str("line\nbreak"), r#""line\nbreak""#);
        // Escaped interior quotes keep the literal closed where it started.
        let lit = js_str(r#"", alert(1), ""#);
        assert!(lit.starts_with('"') && lit.ends_with('"'));
        assert!(lit[1..lit.len() - 1].matches('"').count() == 0 || lit.contains("\\\""));
    }

    #[test]
    fn validate_url_schemes() {
        assert!(validate_url("https://example.com/search?q=x").is_ok());
        assert!(validate_url("http://localhost:8080").is_ok());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
