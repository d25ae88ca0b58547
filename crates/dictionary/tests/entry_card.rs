//! End-to-end entry-card flow against a locally served fixture page.
//!
//! Needs a Chromium binary on the machine, so the test is ignored by
//! default: `cargo test -p wortbot-dictionary -- --ignored`.

#![allow(clippy::expect_used)]

use std::sync::Arc;

use {
    wortbot_browser::{BrowserPool, BrowserPoolConfig},
    wortbot_cache::ResultCache,
    wortbot_dictionary::{EntryCardRenderer, EntryCardRequest},
};

/// Minimal stand-in for the dictionary page: the entry container is the
/// third child of `.lr_container`. The text fields are absent, which the
/// flow tolerates; the dark text guarantees the trim step finds content.
const FIXTURE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="margin:0;background:#ffffff">
    <div class="lr_container">
      <div>nav</div>
      <div>ads</div>
      <div style="width:400px;padding:8px">
        <div style="color:#000;font-size:24px">lauf</div>
        <div style="color:#333">a word for running</div>
      </div>
    </div>
  </body>
</html>"#;

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary"]
async fn renders_once_then_serves_from_cache() {
    let mut server = mockito::Server::new_async().await;
    let page = server
        .mock("GET", "/entry")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(FIXTURE_HTML)
        .expect(1)
        .create_async()
        .await;

    let cache_dir = tempfile::tempdir().expect("tempdir");
    let cache = ResultCache::new(cache_dir.path());

    let pool = Arc::new(
        BrowserPool::launch(BrowserPoolConfig {
            pool_size: 1,
            ..BrowserPoolConfig::default()
        })
        .await
        .expect("browser pool"),
    );

    let renderer = EntryCardRenderer::new(
        Arc::clone(&pool),
        cache,
        format!("{}/entry", server.url()),
    );

    let request = EntryCardRequest {
        word: "lauf".into(),
        ipa: "laʊf".into(),
        part_of_speech: "Verb".into(),
        meaning: "to run".into(),
        example: "Ich laufe schnell.".into(),
        zoom: 1,
    };

    let first = renderer.render(&request).await.expect("first render");
    assert!(!first.is_empty());
    assert_eq!(pool.busy_count(), 0, "lease must be released after the render");

    // The identical request is answered from the cache: the page mock
    // stays at exactly one hit.
    let second = renderer.render(&request).await.expect("cached render");
    assert_eq!(first, second);
    page.assert_async().await;
}
