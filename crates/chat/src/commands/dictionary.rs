//! Dictionary commands: render, add, remove, list, search.

use std::time::Duration;

use {
    async_trait::async_trait,
    wortbot_dictionary::{EntryCardRequest, Word, split_word},
};

use crate::{
    commands::{opt_u32_arg, str_arg},
    error::ChatError,
    help::help_embed,
    parse::ArgValue,
    reply::{COLOR_ERROR, COLOR_SUCCESS, Embed, Reply, ReplySink},
    router::Command,
    services::Services,
};

/// How long listing replies stick around before the platform removes them.
const LISTING_TTL: Duration = Duration::from_secs(2 * 60);

fn word_usage(name: &str, description: &str) -> Embed {
    help_embed(
        &format!("!wort {name}"),
        description,
        &format!(
            "!wort {name} \"rein·joi·nen\" \"ˈraɪndʒɔɪnən\" \"Verb\" \"einen Internetanruf oder \
             eine Videospielsession betreten\" \"Ahh! Er ist wieder reingejoined.\""
        ),
        &[
            ("word", "The word. This symbol might be helpful: `·`"),
            (
                "ipa",
                "The phonetic transcription of the word. **Mark the start of a stressed syllable \
                 with one of these: `ˈ'´`.** The `!g2p` command helps transcribing.",
            ),
            (
                "part_of_speech",
                "The part of speech of the word. E.g. `Substantiv`, `Verb`, `Adjektiv`.",
            ),
            ("meaning", "The meaning of the word."),
            ("example", "An example usage of the word."),
            (
                "zoom",
                "Optional magnification factor for the rendered card. Default is `3`.",
            ),
        ],
    )
}

fn word_from_args(args: &[ArgValue]) -> Result<Word, ChatError> {
    let word = str_arg(args, 0, "word")?;
    let ipa = str_arg(args, 1, "ipa")?;
    let part_of_speech = str_arg(args, 2, "part_of_speech")?;
    let meaning = str_arg(args, 3, "meaning")?;
    let example = str_arg(args, 4, "example")?;
    Ok(Word::new(
        split_word(word),
        ipa,
        part_of_speech,
        meaning,
        example,
    )?)
}

/// Render a word into its entry-card embed plus image attachment.
async fn entry_reply(
    services: &Services,
    word: &Word,
    zoom: u32,
    note: Option<&str>,
) -> Result<Reply, ChatError> {
    let request = EntryCardRequest::from_word(word, zoom);
    let image = services.entry_cards.render(&request).await?;

    let display_name = word.display_name();
    let mut description = String::new();
    if let Some(note) = note {
        description.push_str(note);
        description.push_str("\n\n");
    }
    description.push_str(&format!(
        "word: `{display_name}`\n\
         ipa: `{}`\n\
         part of speech: `{}`\n\
         meaning: `{}`\n\
         example: `{}`\n\
         command: `{}`",
        word.ipa,
        word.part_of_speech,
        word.meaning,
        word.example,
        word.render_command(),
    ));

    let embed = Embed::new()
        .title(display_name)
        .description(description)
        .color(COLOR_SUCCESS)
        .image_attachment("image.png");

    Ok(Reply::embed(embed).with_attachment("image.png", image))
}

/// `!wort render` — render an entry without storing it.
pub struct RenderCommand;

#[async_trait]
impl Command for RenderCommand {
    fn alias(&self) -> &'static str {
        "!wort render"
    }

    fn usage(&self) -> Embed {
        word_usage(
            "render",
            "Renders a dictionary entry. To add one to the dictionary, use `!wort add`.",
        )
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let word = word_from_args(args)?;
        let zoom = opt_u32_arg(args, 5, "zoom", services.default_zoom)?;
        sink.send(entry_reply(services, &word, zoom, None).await?)
            .await?;
        Ok(())
    }
}

/// `!wort add` — render an entry and persist it.
pub struct AddCommand;

#[async_trait]
impl Command for AddCommand {
    fn alias(&self) -> &'static str {
        "!wort add"
    }

    fn usage(&self) -> Embed {
        word_usage("add", "Adds the described word to the dictionary.")
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let word = word_from_args(args)?;
        let zoom = opt_u32_arg(args, 5, "zoom", services.default_zoom)?;

        services.dictionary.lock().await.add(word.clone())?;

        let reply = entry_reply(services, &word, zoom, Some("Added word to dictionary ✅")).await?;
        sink.send(reply).await?;
        Ok(())
    }
}

/// `!wort remove` — delete an entry by exact key.
pub struct RemoveCommand;

#[async_trait]
impl Command for RemoveCommand {
    fn alias(&self) -> &'static str {
        "!wort remove"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!wort remove",
            "Removes a word from the dictionary.",
            "!wort remove \"reinjoinen\"",
            &[(
                "word",
                "The word to be deleted. Requires an exact match and is case-sensitive.",
            )],
        )
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let key = str_arg(args, 0, "word")?;

        let embed = match services.dictionary.lock().await.remove(key) {
            Ok(_) => Embed::new()
                .description(format!("Word `{key}` successfully removed. ✅"))
                .color(COLOR_SUCCESS),
            Err(wortbot_dictionary::DictionaryError::NotFound(_)) => Embed::new()
                .description(format!("Can't find a word `{key}`. 😢"))
                .color(COLOR_ERROR),
            Err(e) => return Err(e.into()),
        };

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}

/// `!wort list` — every entry, rendered, sorted by key.
pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    fn alias(&self) -> &'static str {
        "!wort list"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!wort list",
            "Lists all the words in the dictionary.",
            "!wort list",
            &[],
        )
    }

    async fn run(
        &self,
        services: &Services,
        _args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let words: Vec<Word> = {
            let dict = services.dictionary.lock().await;
            sink.send(
                Reply::embed(
                    Embed::new()
                        .title("Dictionary Listing")
                        .description(format!("total word count: `{}`", dict.len())),
                )
                .with_content("temporary message, gets auto-deleted after 2 min")
                .delete_after(LISTING_TTL),
            )
            .await?;
            dict.words().cloned().collect()
        };

        for word in words {
            let reply = entry_reply(services, &word, services.default_zoom, None).await?;
            sink.send(reply.delete_after(LISTING_TTL)).await?;
        }
        Ok(())
    }
}

/// `!wort search` — find entries by key substring.
pub struct SearchCommand;

#[async_trait]
impl Command for SearchCommand {
    fn alias(&self) -> &'static str {
        "!wort search"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!wort search",
            "Searches for a word in the dictionary.",
            "!wort search \"reinjoinen\"",
            &[("search_query", "The search query.")],
        )
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let query = str_arg(args, 0, "search_query")?;

        let results: Vec<Word> = {
            let dict = services.dictionary.lock().await;
            dict.search(query).into_iter().cloned().collect()
        };

        if results.is_empty() {
            sink.send(Reply::embed(
                Embed::new()
                    .description(format!("No search results found for query `{query}`. 😢"))
                    .color(COLOR_ERROR),
            ))
            .await?;
            return Ok(());
        }

        for (i, word) in results.iter().enumerate() {
            let note = format!("Search result #{}", i + 1);
            let reply =
                entry_reply(services, word, services.default_zoom, Some(&note)).await?;
            sink.send(reply).await?;
        }
        Ok(())
    }
}
