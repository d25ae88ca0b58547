//! Outbound reply model and the delivery interface.

use std::time::Duration;

use async_trait::async_trait;

pub const COLOR_SUCCESS: u32 = 0x00FF00;
pub const COLOR_ERROR: u32 = 0xFF0000;
pub const COLOR_HELP: u32 = 0xFFFF00;

/// A rich embed, the platform-neutral shape of the original bot's cards.
#[derive(Debug, Clone, Default)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    /// Filename of an attachment to display as the embed image.
    pub image_attachment: Option<String>,
    /// Remote image URL, for previews already hosted elsewhere.
    pub image_url: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    #[must_use]
    pub fn field_block(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    #[must_use]
    pub fn image_attachment(mut self, filename: impl Into<String>) -> Self {
        self.image_attachment = Some(filename.into());
        self
    }

    #[must_use]
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

/// A binary attachment delivered alongside a reply.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// One outbound message.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub attachments: Vec<Attachment>,
    /// Hint for the platform to remove the message again.
    pub delete_after: Option<Duration>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.attachments.push(Attachment {
            filename: filename.into(),
            bytes,
        });
        self
    }

    #[must_use]
    pub fn delete_after(mut self, after: Duration) -> Self {
        self.delete_after = Some(after);
        self
    }
}

/// Delivery into the chat platform — the embedding application provides
/// the implementation.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, reply: Reply) -> anyhow::Result<()>;
}
