//! Console reply sink: embeds go to stdout, attachments to disk.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use {async_trait::async_trait, tracing::debug};

use wortbot_chat::{Reply, ReplySink};

pub struct ConsoleSink {
    out_dir: PathBuf,
    counter: AtomicUsize,
}

impl ConsoleSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            out_dir,
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn send(&self, reply: Reply) -> anyhow::Result<()> {
        if let Some(content) = &reply.content {
            println!("{content}");
        }

        for embed in &reply.embeds {
            if let Some(title) = &embed.title {
                println!("== {title} ==");
            }
            if let Some(description) = &embed.description {
                println!("{description}");
            }
            for field in &embed.fields {
                println!("[{}] {}", field.name, field.value);
            }
            if let Some(url) = &embed.image_url {
                println!("(image: {url})");
            }
            if let Some(footer) = &embed.footer {
                println!("-- {footer}");
            }
        }

        for attachment in &reply.attachments {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            let path = self.out_dir.join(format!("{n:04}-{}", attachment.filename));
            tokio::fs::create_dir_all(&self.out_dir).await?;
            tokio::fs::write(&path, &attachment.bytes).await?;
            println!("(attachment written to {})", path.display());
        }

        debug!(
            embeds = reply.embeds.len(),
            attachments = reply.attachments.len(),
            "reply delivered"
        );
        Ok(())
    }
}
