//! `!zitat` — quote cards on random backgrounds.

use async_trait::async_trait;

use crate::{
    commands::str_arg,
    error::ChatError,
    help::help_embed,
    parse::ArgValue,
    reply::{Embed, Reply, ReplySink},
    router::Command,
    services::Services,
};

pub struct QuoteCommand;

#[async_trait]
impl Command for QuoteCommand {
    fn alias(&self) -> &'static str {
        "!zitat"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!zitat",
            "Generates a Zitat.",
            "!zitat \"Trapdoors und Repeater sind eigentlich das gleiche.\" \"Zwakel\"",
            &[
                ("text", "The text of the Zitat."),
                (
                    "author",
                    "The author of the Zitat to be displayed at the bottom of it.",
                ),
            ],
        )
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let text = str_arg(args, 0, "text")?;
        let author = str_arg(args, 1, "author")?;

        let card = services
            .quotes
            .render(
                text,
                author,
                services.measurer.as_ref(),
                services.compositor.as_ref(),
            )
            .await?;

        sink.send(Reply::text("pure inspiration.").with_attachment("zitat.png", card))
            .await?;
        Ok(())
    }
}
