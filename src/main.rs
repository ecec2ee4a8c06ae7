use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info};
use wordserve::{Dictionary, Server, ServerConfig};

/// Interactive spelling server: suggests the closest dictionary words for
/// each word of a client's line and lets the client add unknown words.
#[derive(Parser, Debug)]
#[command(name = "wordserve", version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on [default: 0.0.0.0:60000]
    #[arg(short, long)]
    bind: Option<String>,

    /// Word list, one word per line [default: basic_english_2000.txt]
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Suggestions shown per word [default: 5]
    #[arg(short = 'k', long)]
    suggestions: Option<usize>,

    /// Serve clients in parallel instead of one at a time
    #[arg(long)]
    concurrent: bool,

    /// error, warn, info, debug or trace; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}

fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.bind = bind.clone();
    }
    if let Some(dictionary) = &cli.dictionary {
        config.dictionary = dictionary.clone();
    }
    if let Some(suggestions) = cli.suggestions {
        config.suggestions = suggestions;
    }
    config.concurrent |= cli.concurrent;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = load_config(&cli)?;
    if !config.dictionary.exists() {
        bail!("could not find the word list: {}", config.dictionary.display());
    }
    let dictionary = Dictionary::load(&config.dictionary)?;

    let server = Server::bind(config, dictionary.into_shared())
        .context("failed to start server")?;
    info!("waiting for connections");
    server.run();
    Ok(())
}
