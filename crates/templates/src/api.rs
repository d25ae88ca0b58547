//! REST client for template metadata and search.

use {
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::error::{Result, TemplateError};

/// Size filters accepted by the search endpoint, for help text.
pub const SIZE_OPTIONS: &[&str] = &[
    "all",
    "poster",
    "a1",
    "a2",
    "a3",
    "a4",
    "album-cover",
    "banner-2-6",
    "banner-2-8",
    "banner-4-6",
    "business-card",
    "desktop-wallpaper",
    "desktop-wallpaper-inverted",
    "etsy-banner",
    "facebook-ad",
    "facebook-cover",
    "facebook-cover-video",
    "facebook-shared-image",
    "flyer-letter",
    "google-cover",
    "instagram-post",
    "kindle-cover",
    "large-rectangle",
    "leaderboard",
    "linkedin-banner",
    "linkedin-bg-image",
    "linkedin-career-cover",
    "medium-rectangle",
    "menu-half-page-legal",
    "menu-half-page-letter",
    "menu-half-page-wide",
    "menu-poster-wallboard",
    "pinterest-graphic",
    "presentation",
    "presentation-169",
    "square",
    "tabloid",
    "tumblr-banner",
    "tumblr-graphic",
    "twitter-header",
    "twitter-post",
    "us-legal",
    "wide-skyscraper",
    "youtube-channel-cover",
    "youtube-thumbnail",
];

/// Whether a template renders to a still image or a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Image,
    Video,
}

/// Template metadata as used by the chat commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: TemplateKind,
    pub customize_url: String,
    pub preview_url: String,
    pub thumb_url: String,
    pub preview_dimensions: (u32, u32),
    pub thumb_dimensions: (u32, u32),
}

/// Raw API payload; preview fields depend on the template type and
/// dimensions arrive as numbers or numeric strings.
#[derive(Debug, Deserialize)]
struct TemplateDto {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "type")]
    kind: TemplateKind,
    customize_url: String,
    #[serde(default)]
    preview_url: Option<String>,
    #[serde(default)]
    thumb_url: Option<String>,
    #[serde(default)]
    preview_video_url: Option<String>,
    #[serde(default)]
    thumb_video_url: Option<String>,
    preview_width: Dimension,
    preview_height: Dimension,
    thumb_width: Dimension,
    thumb_height: Dimension,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Dimension {
    Num(u32),
    Str(String),
}

impl Dimension {
    fn value(&self) -> Result<u32> {
        match self {
            Dimension::Num(n) => Ok(*n),
            Dimension::Str(s) => s
                .parse()
                .map_err(|_| TemplateError::MalformedPayload(format!("bad dimension {s:?}"))),
        }
    }
}

impl TryFrom<TemplateDto> for Template {
    type Error = TemplateError;

    fn try_from(dto: TemplateDto) -> Result<Self> {
        let (preview_url, thumb_url) = match dto.kind {
            TemplateKind::Image => (dto.preview_url, dto.thumb_url),
            TemplateKind::Video => (dto.preview_video_url, dto.thumb_video_url),
        };
        let preview_url = preview_url.ok_or_else(|| {
            TemplateError::MalformedPayload(format!("template {} has no preview URL", dto.id))
        })?;
        let thumb_url = thumb_url.ok_or_else(|| {
            TemplateError::MalformedPayload(format!("template {} has no thumb URL", dto.id))
        })?;

        Ok(Template {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            kind: dto.kind,
            customize_url: dto.customize_url,
            preview_url,
            thumb_url,
            preview_dimensions: (dto.preview_width.value()?, dto.preview_height.value()?),
            thumb_dimensions: (dto.thumb_width.value()?, dto.thumb_height.value()?),
        })
    }
}

/// Client for the template REST API, authenticated by a client id.
#[derive(Debug, Clone)]
pub struct TemplateClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
}

impl TemplateClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            client_id: client_id.into(),
        }
    }

    /// Fetch one template by id.
    pub async fn template(&self, id: &str) -> Result<Template> {
        let url = format!(
            "{}/templates/{}?client_id={}",
            self.base_url, id, self.client_id
        );
        let dto: TemplateDto = self.get_json(&url).await?;
        dto.try_into()
    }

    /// Search templates by keyword with type and size filters
    /// (`all` disables a filter).
    pub async fn search(&self, keyword: &str, kind: &str, size: &str) -> Result<Vec<Template>> {
        let url = format!(
            "{}/templates?client_id={}&keyword={}&type={}&size={}",
            self.base_url,
            self.client_id,
            urlencoding::encode(keyword),
            kind,
            size,
        );
        let dtos: Vec<TemplateDto> = self.get_json(&url).await?;
        debug!(keyword, results = dtos.len(), "template search");
        dtos.into_iter().map(Template::try_from).collect()
    }

    /// Download a template's preview bytes.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TemplateError::Api {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| TemplateError::Api {
            status: status.as_u16(),
            body: format!("{e}: {body}"),
        })
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_JSON: &str = r#"{
        "id": "5a72a3a166d55ebea89d03eb",
        "name": "Spooky Party",
        "description": "Halloween flyer",
        "type": "image",
        "customize_url": "https://example.org/customize/5a72",
        "preview_url": "https://example.org/p.jpg",
        "thumb_url": "https://example.org/t.jpg",
        "preview_width": "612",
        "preview_height": "792",
        "thumb_width": 154,
        "thumb_height": 200
    }"#;

    #[test]
    fn image_template_uses_image_urls_and_parses_string_dimensions() {
        let dto: TemplateDto = serde_json::from_str(IMAGE_JSON).unwrap();
        let template = Template::try_from(dto).unwrap();
        assert_eq!(template.kind, TemplateKind::Image);
        assert_eq!(template.preview_url, "https://example.org/p.jpg");
        assert_eq!(template.preview_dimensions, (612, 792));
        assert_eq!(template.thumb_dimensions, (154, 200));
    }

    #[test]
    fn video_template_uses_video_urls() {
        let json = r#"{
            "id": "v1",
            "name": "Promo",
            "type": "video",
            "customize_url": "https://example.org/customize/v1",
            "preview_video_url": "https://example.org/p.mp4",
            "thumb_video_url": "https://example.org/t.mp4",
            "preview_width": 640, "preview_height": 360,
            "thumb_width": 160, "thumb_height": 90
        }"#;
        let dto: TemplateDto = serde_json::from_str(json).unwrap();
        let template = Template::try_from(dto).unwrap();
        assert_eq!(template.kind, TemplateKind::Video);
        assert_eq!(template.preview_url, "https://example.org/p.mp4");
    }

    #[test]
    fn missing_preview_is_malformed() {
        let json = r#"{
            "id": "x", "name": "x", "type": "image",
            "customize_url": "https://example.org/c",
            "preview_width": 1, "preview_height": 1,
            "thumb_width": 1, "thumb_height": 1
        }"#;
        let dto: TemplateDto = serde_json::from_str(json).unwrap();
        assert!(matches!(
            Template::try_from(dto),
            Err(TemplateError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn search_builds_query_and_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                "/templates?client_id=key123&keyword=Halloween%20party&type=image&size=a4",
            )
            .with_status(200)
            .with_body(format!("[{IMAGE_JSON}]"))
            .create_async()
            .await;

        let client = TemplateClient::new(reqwest::Client::new(), server.url(), "key123");
        let results = client.search("Halloween party", "image", "a4").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Spooky Party");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_error_embeds_raw_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(403)
            .with_body("invalid client_id")
            .create_async()
            .await;

        let client = TemplateClient::new(reqwest::Client::new(), server.url(), "bad");
        match client.template("abc").await {
            Err(TemplateError::Api { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("invalid client_id"));
            },
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
