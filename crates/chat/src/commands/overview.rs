//! Category overview commands.

use async_trait::async_trait;

use crate::{
    error::ChatError,
    help::help_embed,
    parse::ArgValue,
    reply::{COLOR_HELP, Embed, Reply, ReplySink},
    router::Command,
    services::Services,
};

const HELP_TIP: &str = "Tip: Add a `help` to any command to see what it does.";

/// `!help` — top-level category listing.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn alias(&self) -> &'static str {
        "!help"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!help",
            "Lists all command categories and their respective help commands.",
            "!help",
            &[],
        )
    }

    async fn run(
        &self,
        _services: &Services,
        _args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let embed = Embed::new()
            .title("Commands of the Wortbot")
            .description(HELP_TIP)
            .color(COLOR_HELP)
            .field_block("`!wort`", "Shows all commands related to the dictionary.")
            .field_block("`!poster`", "Shows all commands related to poster templates.")
            .field_block("`!zitat`", "Generates a Zitat.");

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}

/// `!wort` — dictionary category listing.
pub struct WordOverviewCommand;

#[async_trait]
impl Command for WordOverviewCommand {
    fn alias(&self) -> &'static str {
        "!wort"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!wort",
            "Lists all commands of the dictionary category.",
            "!wort",
            &[],
        )
    }

    async fn run(
        &self,
        _services: &Services,
        _args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let embed = Embed::new()
            .title("Dictionary commands of the Wortbot")
            .description(HELP_TIP)
            .color(COLOR_HELP)
            .field_block("`!wort render`", "Renders one dictionary entry.")
            .field_block("`!wort add`", "Adds a word to the dictionary.")
            .field_block("`!wort search`", "Searches for a word in the dictionary.")
            .field_block("`!wort list`", "Shows all words in the dictionary.")
            .field_block("`!wort remove`", "Removes a word from the dictionary.")
            .field_block("`!g2p`", "Grapheme to Phoneme: helps getting the ipa string.");

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}

/// `!poster` — template category listing.
pub struct PosterOverviewCommand;

#[async_trait]
impl Command for PosterOverviewCommand {
    fn alias(&self) -> &'static str {
        "!poster"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!poster",
            "Lists all commands of the poster-template category.",
            "!poster",
            &[],
        )
    }

    async fn run(
        &self,
        _services: &Services,
        _args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let embed = Embed::new()
            .title("Poster commands of the Wortbot")
            .description(HELP_TIP)
            .color(COLOR_HELP)
            .field_block("`!poster search`", "Shows matching templates for a query.")
            .field_block(
                "`!poster attrs`",
                "Shows a template's modifiable elements and their paths.",
            )
            .field_block("`!poster render`", "Renders a template with changes applied.");

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}
