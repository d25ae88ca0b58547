//! Poster-template commands: search, attrs, render.

use {
    async_trait::async_trait,
    wortbot_templates::{SIZE_OPTIONS, Template, TemplateKind, objects},
};

use crate::{
    commands::{opt_str_arg, str_arg},
    error::ChatError,
    help::help_embed,
    parse::ArgValue,
    reply::{COLOR_SUCCESS, Embed, Reply, ReplySink},
    router::Command,
    services::Services,
};

const TEMPLATE_TYPES: [&str; 3] = ["all", "image", "video"];

/// The metadata embed shared by search and attrs output.
fn template_embed(template: &Template) -> Embed {
    let kind = match template.kind {
        TemplateKind::Image => "image",
        TemplateKind::Video => "video",
    };

    let mut embed = Embed::new()
        .title(template.name.clone())
        .description(template.description.clone())
        .field(
            "Properties",
            format!(
                "id: `{}`\ncustomize_url: [customize_url]({})",
                template.id, template.customize_url
            ),
        )
        .field(
            format!("Type: `{kind}`"),
            format!(
                "preview_url: [preview_url]({})\nthumb_url: [thumb_url]({})",
                template.preview_url, template.thumb_url
            ),
        );

    embed = match template.kind {
        TemplateKind::Image => embed.image_url(template.preview_url.clone()),
        TemplateKind::Video => embed.image_attachment("image.png"),
    };
    embed
}

/// `!poster search` — find templates by keyword.
pub struct SearchCommand;

#[async_trait]
impl Command for SearchCommand {
    fn alias(&self) -> &'static str {
        "!poster search"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!poster search",
            "Shows matching templates based on the specified search query.",
            "!poster search \"Halloween\"",
            &[
                ("search_query", "The search query."),
                (
                    "type",
                    "The type of the template. Can be one of `all`, `image`, `video`. Optional.",
                ),
                (
                    "size",
                    "The size of the template, e.g. `a4`, `poster`, `youtube-thumbnail`. \
                     Optional.",
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
        let keyword = str_arg(args, 0, "search_query")?;
        let kind = opt_str_arg(args, 1, "type", "all")?;
        let size = opt_str_arg(args, 2, "size", "all")?;

        if !TEMPLATE_TYPES.contains(&kind) {
            return Err(ChatError::InvalidArguments(format!(
                "`type` must be one of `all`, `image`, `video`, not {kind:?}"
            )));
        }
        if size != "all" && !SIZE_OPTIONS.contains(&size) {
            return Err(ChatError::InvalidArguments(format!(
                "unknown `size` {size:?}"
            )));
        }

        let results = services.templates.search(keyword, kind, size).await?;
        if results.is_empty() {
            sink.send(Reply::text(format!(
                "No templates found for `{keyword}`."
            )))
            .await?;
            return Ok(());
        }

        for template in results {
            let mut reply = Reply::embed(template_embed(&template))
                .with_content("temporary message, gets auto-deleted after 2 min.")
                .delete_after(std::time::Duration::from_secs(2 * 60));

            if template.kind == TemplateKind::Video {
                let preview = services
                    .template_renderer
                    .preview(&services.templates, &template)
                    .await?;
                reply = reply.with_attachment("image.png", preview);
            }
            sink.send(reply).await?;
        }
        Ok(())
    }
}

/// `!poster attrs` — list a template's editable text elements with their
/// index paths.
pub struct AttrsCommand;

#[async_trait]
impl Command for AttrsCommand {
    fn alias(&self) -> &'static str {
        "!poster attrs"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!poster attrs",
            "Shows all modifiable elements with their respective path given a template id.",
            "!poster attrs \"5a72a3a166d55ebea89d03eb\"",
            &[(
                "template_id",
                "The template id obtained by `!poster search`.",
            )],
        )
    }

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError> {
        let id = str_arg(args, 0, "template_id")?;

        let template = services.templates.template(id).await?;
        let graph = services.template_renderer.object_graph(&template).await?;

        let lines: Vec<String> = objects::text_nodes(&graph)
            .iter()
            .map(|(path, text)| objects::format_node(path, text))
            .collect();

        let mut embed = Embed::new()
            .title(format!("Attributes of `{}` ({})", template.id, template.name))
            .description(lines.join("\n"))
            .color(COLOR_SUCCESS);
        if template.kind == TemplateKind::Image {
            embed = embed.image_url(template.preview_url.clone());
        }

        sink.send(Reply::embed(embed)).await?;
        Ok(())
    }
}

/// `!poster render` — render a template with text edits applied.
pub struct RenderCommand;

#[async_trait]
impl Command for RenderCommand {
    fn alias(&self) -> &'static str {
        "!poster render"
    }

    fn usage(&self) -> Embed {
        help_embed(
            "!poster render",
            "Renders a template with the given changes.",
            "!poster render \"5a72a3a166d55ebea89d03eb\" [([2, 1], \"This is modified!\"), \
             ([7, 1], \"500\")]",
            &[
                (
                    "template_id",
                    "The template id obtained by `!poster search`.",
                ),
                (
                    "changes",
                    "A list of `([path...], \"new text\")` pairs. The paths come from \
                     `!poster attrs`.",
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
        let id = str_arg(args, 0, "template_id")?;
        let edits = parse_edits(args.get(1))?;

        let template = services.templates.template(id).await?;
        let image = services.template_renderer.render(&template, &edits).await?;

        let embed = Embed::new()
            .title(format!("Custom Template based on `{id}`"))
            .description(format!("command: `!poster render {id:?} {}`", format_edits(&edits)))
            .color(COLOR_SUCCESS)
            .image_attachment("image.png");

        sink.send(Reply::embed(embed).with_attachment("image.png", image))
            .await?;
        Ok(())
    }
}

/// Convert the parsed `changes` argument into (index path, text) pairs.
fn parse_edits(arg: Option<&ArgValue>) -> Result<Vec<(Vec<usize>, String)>, ChatError> {
    let invalid = |detail: &str| {
        ChatError::InvalidArguments(format!(
            "`changes` must be a list of `([path...], \"text\")` pairs: {detail}"
        ))
    };

    let Some(arg) = arg else {
        return Ok(Vec::new());
    };
    let items = arg.as_list().ok_or_else(|| invalid("not a list"))?;

    let mut edits = Vec::with_capacity(items.len());
    for item in items {
        let pair = item.as_list().ok_or_else(|| invalid("entry is not a pair"))?;
        let [path, text] = pair else {
            return Err(invalid("entry is not a pair of path and text"));
        };

        let indices = path.as_list().ok_or_else(|| invalid("path is not a list"))?;
        let mut converted = Vec::with_capacity(indices.len());
        for index in indices {
            let value = index
                .as_int()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or_else(|| invalid("path indices must be non-negative integers"))?;
            converted.push(value);
        }

        let text = text
            .as_str()
            .ok_or_else(|| invalid("edit text must be a string"))?;
        edits.push((converted, text.to_string()));
    }
    Ok(edits)
}

fn format_edits(edits: &[(Vec<usize>, String)]) -> String {
    let parts: Vec<String> = edits
        .iter()
        .map(|(path, text)| format!("({path:?}, {text:?})"))
        .collect();
    format!("[{}]", parts.join(", "))
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_args;

    #[test]
    fn edits_convert_from_parsed_args() {
        let args = parse_args(r#"[([2, 1], "New"), ([7], "500")]"#).unwrap();
        let edits = parse_edits(args.first()).unwrap();
        assert_eq!(
            edits,
            vec![
                (vec![2, 1], "New".to_string()),
                (vec![7], "500".to_string()),
            ]
        );
    }

    #[test]
    fn missing_edits_default_to_empty() {
        assert!(parse_edits(None).unwrap().is_empty());
    }

    #[test]
    fn malformed_edits_are_invalid_arguments() {
        let args = parse_args(r#"[(1, "x")]"#).unwrap();
        assert!(matches!(
            parse_edits(args.first()),
            Err(ChatError::InvalidArguments(_))
        ));

        let args = parse_args(r#"[([-1], "x")]"#).unwrap();
        assert!(matches!(
            parse_edits(args.first()),
            Err(ChatError::InvalidArguments(_))
        ));
    }
}
