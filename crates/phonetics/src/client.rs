//! HTTP client for the grapheme-to-phoneme service.

use {
    regex::Regex,
    reqwest::multipart::{Form, Part},
    tracing::{debug, info},
    wortbot_cache::ResultCache,
};

use crate::error::{PhoneticsError, Result};

/// Client for the transcription endpoint.
pub struct PhoneticsClient {
    http: reqwest::Client,
    endpoint: String,
    cache: ResultCache,
}

impl PhoneticsClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, cache: ResultCache) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            cache,
        }
    }

    /// Transcribe `word` in language `lng` (e.g. `deu`, `eng-US`) into
    /// aligned IPA phoneme tokens, one per grapheme (`_` marks a silent
    /// grapheme).
    pub async fn transcribe(&self, word: &str, lng: &str) -> Result<Vec<String>> {
        let key = ("g2p", word, lng);
        if let Some(raw) = self.cache.get(&key).await? {
            debug!(word, lng, "transcription served from cache");
            return Ok(process_tokens(&String::from_utf8_lossy(&raw)));
        }

        let form = Form::new()
            .part(
                "i",
                Part::bytes(word.as_bytes().to_vec()).file_name("text.txt"),
            )
            .text("lng", lng.to_string())
            .text("outsym", "ipa")
            .text("oform", "txt")
            .text("align", "yes");

        let envelope = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let download_link = parse_envelope(&envelope)?;
        debug!(download_link, "transcription ready for download");

        let raw = self
            .http
            .get(&download_link)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        self.cache.save(&key, raw.as_bytes()).await?;
        info!(word, lng, "transcribed and cached");

        Ok(process_tokens(&raw))
    }
}

/// Extract the download link from the service's XML envelope, requiring
/// the success flag to be `true`.
fn parse_envelope(envelope: &str) -> Result<String> {
    let success = capture(envelope, r"(?is)<success[^>]*>\s*(.*?)\s*</success>")?
        .ok_or_else(|| PhoneticsError::MalformedResponse("no <success> element".into()))?;

    if !success.eq_ignore_ascii_case("true") {
        return Err(PhoneticsError::Upstream {
            response: envelope.to_string(),
        });
    }

    capture(envelope, r"(?is)<downloadlink[^>]*>\s*(.*?)\s*</downloadlink>")?
        .ok_or_else(|| PhoneticsError::MalformedResponse("no <downloadLink> element".into()))
}

fn capture(text: &str, pattern: &str) -> Result<Option<String>> {
    let re =
        Regex::new(pattern).map_err(|e| PhoneticsError::MalformedResponse(e.to_string()))?;
    Ok(re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Normalize the downloaded token stream: glottal stops are spelled `?`
/// by the service, `+` is an alignment artifact.
pub fn process_tokens(raw: &str) -> Vec<String> {
    raw.trim()
        .replace('?', "ʔ")
        .split_whitespace()
        .map(|token| token.replace('+', ""))
        .collect()
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const OK_ENVELOPE: &str = r#"<?xml version="1.0"?>
        <WebServiceResponseLink>
            <success>true</success>
            <downloadLink>http://example.org/out.txt</downloadLink>
        </WebServiceResponseLink>"#;

    #[test]
    fn envelope_parsing_extracts_link() {
        assert_eq!(
            parse_envelope(OK_ENVELOPE).unwrap(),
            "http://example.org/out.txt"
        );
    }

    #[test]
    fn envelope_failure_embeds_raw_response() {
        let envelope = "<success>false</success><output>unknown language code</output>";
        match parse_envelope(envelope) {
            Err(PhoneticsError::Upstream { response }) => {
                assert!(response.contains("unknown language code"));
            },
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[test]
    fn tokens_are_normalized() {
        assert_eq!(
            process_tokens("l a ʊ f\n"),
            vec!["l", "a", "ʊ", "f"]
        );
        assert_eq!(process_tokens("? a+ _"), vec!["ʔ", "a", "_"]);
    }

    #[tokio::test]
    async fn transcribe_posts_then_downloads_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let download_path = "/download/out.txt";

        let envelope = format!(
            "<success>true</success><downloadLink>{}{}</downloadLink>",
            server.url(),
            download_path
        );
        let post = server
            .mock("POST", "/runG2P")
            .with_status(200)
            .with_body(envelope)
            .expect(1)
            .create_async()
            .await;
        let get = server
            .mock("GET", download_path)
            .with_status(200)
            .with_body("l a ʊ f")
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = PhoneticsClient::new(
            reqwest::Client::new(),
            format!("{}/runG2P", server.url()),
            ResultCache::new(dir.path()),
        );

        let phonemes = client.transcribe("lauf", "deu").await.unwrap();
        assert_eq!(phonemes, vec!["l", "a", "ʊ", "f"]);

        // Second call is served from the cache: mocks stay at one hit each.
        let again = client.transcribe("lauf", "deu").await.unwrap();
        assert_eq!(again, phonemes);

        post.assert_async().await;
        get.assert_async().await;
    }

    #[tokio::test]
    async fn transcribe_surfaces_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/runG2P")
            .with_status(200)
            .with_body("<success>false</success><output>no such language</output>")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let client = PhoneticsClient::new(
            reqwest::Client::new(),
            format!("{}/runG2P", server.url()),
            ResultCache::new(dir.path()),
        );

        assert!(matches!(
            client.transcribe("lauf", "xyz").await,
            Err(PhoneticsError::Upstream { .. })
        ));
    }
}
