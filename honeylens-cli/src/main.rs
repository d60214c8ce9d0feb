//! honeylens CLI
//!
//! Scores web pages for cognitive honeypot patterns.

mod config;
mod report;
mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use url::Url;

use honeylens_dom::{fetch_page, FetchConfig, Page};
use honeylens_runtime::{
    engine_channel, ChannelSink, Engine, EngineHandle, FanoutSink, MemoryStore,
    SensitivityStore, Throttle, TomlFileStore, TracingSink, WebhookSink,
};

use crate::config::HoneylensConfig;
use crate::report::{render_badge, render_result, render_weights, ScanReport};
use crate::session::{SessionCommand, HELP};

#[derive(Parser)]
#[command(name = "honeylens")]
#[command(author, version, about = "honeylens: cognitive honeypot detection for web pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a page once
    Scan {
        /// HTML file path or http(s) URL
        target: String,

        /// URL the file was served from (defaults to its file:// URL)
        #[arg(long)]
        url: Option<String>,

        /// Override the stored sensitivity (0-100)
        #[arg(short, long)]
        sensitivity: Option<String>,

        /// Configuration file
        #[arg(short, long, env = "HONEYLENS_CONFIG", default_value = "honeylens.toml")]
        config: PathBuf,

        /// Print a JSON report instead of the summary
        #[arg(long)]
        json: bool,
    },

    /// Attach an engine to a page and drive it from stdin
    Session {
        /// HTML file path or http(s) URL
        target: String,

        /// URL the file was served from (defaults to its file:// URL)
        #[arg(long)]
        url: Option<String>,

        /// Configuration file
        #[arg(short, long, env = "HONEYLENS_CONFIG", default_value = "honeylens.toml")]
        config: PathBuf,
    },

    /// Seed the default sensitivity in the configuration file
    Init {
        /// Configuration file
        #[arg(short, long, env = "HONEYLENS_CONFIG", default_value = "honeylens.toml")]
        config: PathBuf,
    },

    /// Show the active weight table
    Weights {
        /// Configuration file
        #[arg(short, long, env = "HONEYLENS_CONFIG", default_value = "honeylens.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Commands::Scan {
            target,
            url,
            sensitivity,
            config,
            json,
        } => {
            run_scan(&target, url, sensitivity, &config, json).await?;
        }
        Commands::Session {
            target,
            url,
            config,
        } => {
            run_session(&target, url, &config).await?;
        }
        Commands::Init { config } => {
            let store = TomlFileStore::new(&config);
            if store.initialize_default().await? {
                println!("Seeded default sensitivity in {}", config.display());
            } else {
                println!("Sensitivity already set in {}", config.display());
            }
        }
        Commands::Weights { config } => {
            let table = HoneylensConfig::from_file(&config)?.weight_table()?;
            print!("{}", render_weights(&table));
        }
    }

    Ok(())
}

fn is_remote(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

async fn load_page(target: &str, url: Option<&str>, fetch: &FetchConfig) -> Result<Page> {
    if is_remote(target) {
        return fetch_page(target, fetch)
            .await
            .with_context(|| format!("Failed to fetch {}", target));
    }

    let url = url
        .map(Url::parse)
        .transpose()
        .context("Invalid --url")?;
    Page::from_file(target, url).with_context(|| format!("Failed to load {}", target))
}

async fn run_scan(
    target: &str,
    url: Option<String>,
    sensitivity: Option<String>,
    config_path: &Path,
    json: bool,
) -> Result<()> {
    let config = HoneylensConfig::from_file(config_path)?;
    let weights = config.weight_table()?;
    let page = load_page(target, url.as_deref(), &config.fetch).await?;

    let store: Box<dyn SensitivityStore> = match sensitivity {
        Some(value) => Box::new(MemoryStore::new(Some(value))),
        None => Box::new(TomlFileStore::new(config_path)),
    };

    let mut engine = Engine::new(page, TracingSink).with_weights(weights);
    let result = engine.attach(store.as_ref()).await;

    if json {
        let report = ScanReport {
            url: engine.page().url().as_str(),
            fingerprint: engine.page().fingerprint(),
            scanned_at: chrono::Utc::now(),
            sensitivity: engine.context().sensitivity,
            weights_version: &engine.context().weights.version,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", engine.page().url());
        print!("{}", render_result(&result));
    }

    Ok(())
}

async fn run_session(target: &str, url: Option<String>, config_path: &Path) -> Result<()> {
    let config = HoneylensConfig::from_file(config_path)?;
    let weights = config.weight_table()?;
    let page = load_page(target, url.as_deref(), &config.fetch).await?;

    let (badge_sink, mut badges) = ChannelSink::new();
    let mut sink = FanoutSink::new().with(badge_sink).with(TracingSink);
    if let Some(webhook_url) = &config.notify.webhook_url {
        info!("Forwarding badge updates to {}", webhook_url);
        sink = sink.with(WebhookSink::new(webhook_url.clone()));
    }

    let printer = tokio::spawn(async move {
        while let Some(update) = badges.recv().await {
            println!("{}", render_badge(&update));
        }
    });

    let mut engine = Engine::new(page, sink)
        .with_weights(weights)
        .with_throttle(Throttle::from_millis(config.throttle.cooldown_ms));

    let store = TomlFileStore::new(config_path);
    let initial = engine.attach(&store).await;
    print!("{}", render_result(&initial));
    println!("{}", HELP);

    let (handle, triggers) = engine_channel();
    let source = PageSource {
        target: target.to_string(),
        url,
        fetch: config.fetch.clone(),
    };

    let ((), outcome) = tokio::join!(engine.run(triggers), drive_session(handle, source));

    drop(engine);
    printer.await.ok();
    outcome
}

/// Where `reload` re-reads the document from
struct PageSource {
    target: String,
    url: Option<String>,
    fetch: FetchConfig,
}

impl PageSource {
    async fn read(&self) -> Result<String> {
        let page = load_page(&self.target, self.url.as_deref(), &self.fetch).await?;
        Ok(page.source().to_string())
    }
}

/// Forward stdin commands to the engine until `quit` or end of input
async fn drive_session(handle: EngineHandle, source: PageSource) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Interact(kind) => handle.interaction(kind).await?,
            SessionCommand::Query => {
                let result = handle.query().await?;
                print!("{}", render_result(&result));
            }
            SessionCommand::Sensitivity(value) => handle.config_changed(value).await?,
            SessionCommand::Reload => {
                let html = source.read().await?;
                handle.mutate(html).await?;
                println!("Reloaded {}", source.target);
            }
            SessionCommand::Quit => break,
        }
    }

    Ok(())
}
