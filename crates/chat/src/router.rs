//! Command registry, dispatch, and the error boundary.

use {
    async_trait::async_trait,
    tracing::{debug, error, warn},
};

use crate::{
    error::ChatError,
    parse::{ArgValue, parse_args},
    reply::{COLOR_ERROR, Embed, Reply, ReplySink},
    services::Services,
};

/// One registered chat command.
#[async_trait]
pub trait Command: Send + Sync {
    /// The alias this command answers to, e.g. `!wort render`.
    fn alias(&self) -> &'static str;

    /// The usage embed shown for `<alias> help` and argument errors.
    fn usage(&self) -> Embed;

    async fn run(
        &self,
        services: &Services,
        args: &[ArgValue],
        sink: &dyn ReplySink,
    ) -> Result<(), ChatError>;
}

/// Routes inbound lines to commands. The longest matching alias wins, so
/// `!wort render` shadows `!wort`.
pub struct Router {
    commands: Vec<Box<dyn Command>>,
}

impl Router {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    /// All commands with the default set registered.
    pub fn with_default_commands() -> Self {
        Self::new(crate::commands::default_commands())
    }

    fn find(&self, line: &str) -> Option<(&dyn Command, usize)> {
        self.commands
            .iter()
            .filter(|c| {
                let alias = c.alias();
                line.starts_with(alias)
                    && line[alias.len()..]
                        .chars()
                        .next()
                        .is_none_or(char::is_whitespace)
            })
            .max_by_key(|c| c.alias().len())
            .map(|c| (c.as_ref(), c.alias().len()))
    }

    /// Dispatch one inbound line.
    ///
    /// Unknown lines are ignored. Malformed arguments answer with the
    /// command's usage embed. Any handler failure is logged and turned
    /// into an error reply; no error escapes this boundary.
    pub async fn dispatch(&self, line: &str, services: &Services, sink: &dyn ReplySink) {
        let line = line.trim();
        let Some((command, alias_len)) = self.find(line) else {
            debug!(line, "no command matched");
            return;
        };

        let remainder = line[alias_len..].trim();
        if remainder == "help" {
            self.deliver(sink, Reply::embed(command.usage())).await;
            return;
        }

        let args = match parse_args(remainder) {
            Ok(args) => args,
            Err(e) => {
                warn!(alias = command.alias(), error = %e, "argument parse failed");
                let usage = command
                    .usage()
                    .footer(format!("Couldn't read the arguments: {e}"));
                self.deliver(sink, Reply::embed(usage)).await;
                return;
            },
        };

        match command.run(services, &args, sink).await {
            Ok(()) => {},
            Err(ChatError::InvalidArguments(reason)) => {
                let usage = command.usage().footer(reason);
                self.deliver(sink, Reply::embed(usage)).await;
            },
            Err(e) => {
                error!(alias = command.alias(), error = %e, "command failed");
                self.deliver(sink, Reply::embed(error_embed(&e))).await;
            },
        }
    }

    async fn deliver(&self, sink: &dyn ReplySink, reply: Reply) {
        if let Err(e) = sink.send(reply).await {
            error!(error = %e, "failed to deliver reply");
        }
    }
}

/// The apologetic error embed, with the full error chain for diagnosis.
fn error_embed(err: &ChatError) -> Embed {
    Embed::new()
        .title("Error")
        .description(format!(
            "Oh snap! Something went wrong:\n```{}```\n\
             Don't be scared to read the error, most are simple mistakes \
             and can be easily resolved! Sometimes, trying again helps.",
            error_chain(err)
        ))
        .color(COLOR_ERROR)
}

/// Render an error and its source chain, one cause per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(&format!("\ncaused by: {cause}"));
        source = cause.source();
    }
    out
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCommand {
        alias: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl Command for EchoCommand {
        fn alias(&self) -> &'static str {
            self.alias
        }

        fn usage(&self) -> Embed {
            Embed::new().title(format!("Usage of `{}`", self.alias))
        }

        async fn run(
            &self,
            _services: &Services,
            args: &[ArgValue],
            sink: &dyn ReplySink,
        ) -> Result<(), ChatError> {
            if self.fail {
                return Err(ChatError::InvalidArguments("always fails".into()));
            }
            sink.send(Reply::text(format!("{}: {} args", self.alias, args.len())))
                .await?;
            Ok(())
        }
    }

    fn router() -> Router {
        Router::new(vec![
            Box::new(EchoCommand {
                alias: "!echo",
                fail: false,
            }),
            Box::new(EchoCommand {
                alias: "!echo loud",
                fail: false,
            }),
            Box::new(EchoCommand {
                alias: "!broken",
                fail: true,
            }),
        ])
    }

    #[test]
    fn longest_alias_wins() {
        let router = router();
        let (cmd, len) = router.find("!echo loud \"x\"").unwrap();
        assert_eq!(cmd.alias(), "!echo loud");
        assert_eq!(len, "!echo loud".len());

        let (cmd, _) = router.find("!echo \"x\"").unwrap();
        assert_eq!(cmd.alias(), "!echo");
    }

    #[test]
    fn alias_must_end_at_word_boundary() {
        let router = router();
        assert!(router.find("!echoes").is_none());
        assert!(router.find("!unknown").is_none());
    }

    #[test]
    fn error_chain_walks_sources() {
        let io = std::io::Error::other("disk fell off");
        let err = ChatError::Dictionary(wortbot_dictionary::DictionaryError::Persist(io));
        let chain = error_chain(&err);
        assert!(chain.contains("disk fell off"));
    }
}
