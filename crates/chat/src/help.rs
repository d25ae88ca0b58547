//! Help-embed construction.

use crate::reply::{COLOR_HELP, Embed};

/// Build the standard usage embed for a command: description, invocation
/// example, and one field per argument.
pub fn help_embed(
    command: &str,
    description: &str,
    example: &str,
    args: &[(&str, &str)],
) -> Embed {
    let mut embed = Embed::new()
        .title(format!("Usage of `{command}`"))
        .description(format!("{description}\n\nExample: ```{example}```"))
        .color(COLOR_HELP);

    for (name, value) in args {
        embed = embed.field_block(*name, *value);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_embed_carries_example_and_args() {
        let embed = help_embed(
            "!wort render",
            "Renders a dictionary entry.",
            "!wort render \"lau·fen\" \"ˈlaʊfən\" \"Verb\" \"rennen\" \"Ich laufe.\"",
            &[("word", "The word. This symbol might be helpful: `·`")],
        );
        assert_eq!(embed.color, Some(COLOR_HELP));
        assert!(embed.description.as_deref().is_some_and(|d| d.contains("```")));
        assert_eq!(embed.fields.len(), 1);
    }
}
