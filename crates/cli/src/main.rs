//! `wortbot` — dictionary-card chat bot, driven from the terminal.
//!
//! The `repl` mode feeds stdin lines through the chat router the way a
//! connected chat platform would, printing embeds and writing image
//! attachments to an output directory.

mod sink;
mod text;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    wortbot_browser::{BrowserPool, BrowserPoolConfig},
    wortbot_cache::ResultCache,
    wortbot_chat::{Router, Services},
    wortbot_config::WortbotConfig,
    wortbot_dictionary::{Dictionary, EntryCardRenderer, EntryCardRequest, Word, split_word},
    wortbot_media::quote::{QuoteConfig, QuoteRenderer},
    wortbot_phonetics::{PhoneticsClient, syllables},
    wortbot_templates::{TemplateClient, TemplateRenderer, render::RenderSettings},
};

#[derive(Parser)]
#[command(name = "wortbot", about = "Wortbot — dictionary-card chat bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file (overrides discovery of wortbot.{toml,yaml,json}).
    #[arg(long, global = true, env = "WORTBOT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat lines from stdin and dispatch them (default).
    Repl {
        /// Directory image attachments are written to.
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Render one dictionary entry card to a file.
    Render {
        word: String,
        ipa: String,
        part_of_speech: String,
        meaning: String,
        example: String,
        #[arg(long)]
        zoom: Option<u32>,
        #[arg(long, default_value = "out.png")]
        out: PathBuf,
    },
    /// Predict a word's phonetic transcription and syllable structure.
    G2p { word: String, lang: String },
    /// Search poster templates.
    Search {
        keyword: String,
        #[arg(long, default_value = "all")]
        r#type: String,
        #[arg(long, default_value = "all")]
        size: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);

    let config = match &cli.config {
        Some(path) => wortbot_config::load_config(path)?,
        None => wortbot_config::discover_and_load(),
    };

    match cli.command.unwrap_or(Commands::Repl {
        out_dir: PathBuf::from("out"),
    }) {
        Commands::Repl { out_dir } => repl(config, out_dir).await,
        Commands::Render {
            word,
            ipa,
            part_of_speech,
            meaning,
            example,
            zoom,
            out,
        } => {
            render_one(config, &word, &ipa, &part_of_speech, &meaning, &example, zoom, &out).await
        },
        Commands::G2p { word, lang } => g2p_one(config, &word, &lang).await,
        Commands::Search {
            keyword,
            r#type,
            size,
        } => search_one(config, &keyword, &r#type, &size).await,
    }
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wortbot={log_level}")));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

/// Wire every service against the loaded config. Launches the browser
/// pool eagerly.
async fn build_services(config: &WortbotConfig) -> anyhow::Result<Services> {
    let http = reqwest::Client::new();
    let cache = ResultCache::new(&config.cache.dir);

    let pool = Arc::new(
        BrowserPool::launch(BrowserPoolConfig::from(&config.browser))
            .await
            .context("failed to launch browser pool")?,
    );

    let dictionary = Dictionary::open(&config.dictionary.dir, &config.dictionary.name)?;

    Ok(Services {
        dictionary: tokio::sync::Mutex::new(dictionary),
        entry_cards: EntryCardRenderer::new(
            Arc::clone(&pool),
            cache.clone(),
            config.entry_card.page_url.clone(),
        ),
        phonetics: PhoneticsClient::new(
            http.clone(),
            config.phonetics.endpoint.clone(),
            cache.clone(),
        ),
        templates: TemplateClient::new(
            http.clone(),
            config.templates.api_url.clone(),
            config.templates.client_id.clone(),
        ),
        template_renderer: TemplateRenderer::new(
            Arc::clone(&pool),
            cache.clone(),
            RenderSettings {
                settle: std::time::Duration::from_secs(config.templates.settle_secs),
                poll_attempts: config.templates.poll_attempts,
                poll_delay: std::time::Duration::from_secs(config.templates.poll_delay_secs),
            },
        ),
        quotes: QuoteRenderer::new(
            http,
            QuoteConfig {
                background_url: config.quote.background_url.clone(),
                width: config.quote.width,
                height: config.quote.height,
            },
        ),
        measurer: Arc::new(text::HeuristicMeasurer),
        compositor: Arc::new(text::PassthroughCompositor),
        default_zoom: config.entry_card.default_zoom,
    })
}

async fn repl(config: WortbotConfig, out_dir: PathBuf) -> anyhow::Result<()> {
    use tokio::io::AsyncBufReadExt;

    let services = build_services(&config).await?;
    let router = Router::with_default_commands();
    let sink = sink::ConsoleSink::new(out_dir);

    info!("ready — type commands like `!help` or `!wort render ...`");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        router.dispatch(&line, &services, &sink).await;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn render_one(
    config: WortbotConfig,
    word: &str,
    ipa: &str,
    part_of_speech: &str,
    meaning: &str,
    example: &str,
    zoom: Option<u32>,
    out: &std::path::Path,
) -> anyhow::Result<()> {
    let cache = ResultCache::new(&config.cache.dir);
    let pool = Arc::new(BrowserPool::launch(BrowserPoolConfig::from(&config.browser)).await?);
    let renderer = EntryCardRenderer::new(pool, cache, config.entry_card.page_url.clone());

    let word = Word::new(split_word(word), ipa, part_of_speech, meaning, example)?;
    let request =
        EntryCardRequest::from_word(&word, zoom.unwrap_or(config.entry_card.default_zoom));
    let bytes = renderer.render(&request).await?;

    std::fs::write(out, &bytes)?;
    println!("wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

async fn g2p_one(config: WortbotConfig, word: &str, lang: &str) -> anyhow::Result<()> {
    let cache = ResultCache::new(&config.cache.dir);
    let client = PhoneticsClient::new(reqwest::Client::new(), config.phonetics.endpoint, cache);

    let phonemes = client.transcribe(word, lang).await?;
    let (phoneme_syllables, word_syllables) = syllables::segment(&phonemes, word)?;

    println!("ipa: {}", phonemes.concat().replace('_', ""));
    println!(
        "{}",
        syllables::format_structure(&word_syllables, &phoneme_syllables).replace('`', "")
    );
    Ok(())
}

async fn search_one(
    config: WortbotConfig,
    keyword: &str,
    kind: &str,
    size: &str,
) -> anyhow::Result<()> {
    let client = TemplateClient::new(
        reqwest::Client::new(),
        config.templates.api_url,
        config.templates.client_id,
    );

    for template in client.search(keyword, kind, size).await? {
        println!(
            "{}  {:?}  {} ({}x{})",
            template.id,
            template.kind,
            template.name,
            template.preview_dimensions.0,
            template.preview_dimensions.1,
        );
    }
    Ok(())
}
