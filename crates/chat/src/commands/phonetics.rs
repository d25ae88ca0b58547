//! `!g2p` — grapheme-to-phoneme prediction with syllable structure.

use {
    async_trait::async_trait,
    wortbot_dictionary::Word,
    wortbot_phonetics::syllables,
};

use crate::{
    commands::str_arg,
    error::ChatError,
    help::help_embed,
    parse::ArgValue,
    reply::{COLOR_SUCCESS, Embed, Reply, ReplySink},
    router::Command,
    services::Services,
};

pub struct G2pCommand;

#[async_trait]
impl Command for G2pCommand {
    fn alias(&self) -> &'static str {
        "!g2p"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!g2p",
            "Grapheme to Phoneme: helps getting the ipa string.",
            "!g2p \"join\" \"eng-US\"",
            &[
                (
                    "word",
                    "The word that you wish to convert to ipa and get predictions about the \
                     syllabic structure.",
                ),
                (
                    "lang",
                    "The language of the word. E.g. `deu`, `eng-US`. Almost every three-letter \
                     code works; an invalid code lists all possibilities in the error.",
                ),
                (
                    "**IMPORTANT NOTICE**",
                    "This calls an external transcription service intended for academic, \
                     non-profit use. Do not spam and don't send private information.",
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
        let word = str_arg(args, 0, "word")?;
        let lang = str_arg(args, 1, "lang")?;

        let phonemes = services.phonetics.transcribe(word, lang).await?;
        let (phoneme_syllables, word_syllables) = syllables::segment(&phonemes, word)?;

        let display = Word::unstressed(
            word_syllables.clone(),
            &phonemes.concat().replace('_', ""),
        );

        let embed = Embed::new()
            .title(format!("Phonetics of `{word}`"))
            .description(format!(
                "word: `{}`\nipa: `{}`",
                display.display_name(),
                display.ipa
            ))
            .color(COLOR_SUCCESS)
            .field_block(
                "Predicted Syllabic Structure",
                syllables::format_structure(&word_syllables, &phoneme_syllables),
            );

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}
