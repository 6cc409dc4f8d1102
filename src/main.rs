mod config;
mod error;
mod export;
mod network;
mod style;
mod util;
mod view;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use log::warn;

use crate::config::AppConfig;
use crate::export::{inspect_view, render_html, view_json};
use crate::network::{EventLog, IndexerClient, SnapshotSource};
use crate::view::build_view;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Html,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    block_height: u64,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    indexer_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Replay a local channel-event log instead of querying the indexer.
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[arg(long)]
    out: Option<PathBuf>,
    /// Node id, or `source:target` for a channel.
    #[arg(long)]
    inspect: Option<String>,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = resolve_config(&args)?;
    let height = args.block_height;
    if !config.blocks.contains(height) {
        bail!(
            "block height {height} is outside the indexed range {}..={}",
            config.blocks.min,
            config
                .blocks
                .max
                .map_or_else(|| "latest".to_string(), |max| max.to_string())
        );
    }

    let source: Box<dyn SnapshotSource> = match &args.events {
        Some(path) => Box::new(EventLog::load(path)?),
        None => Box::new(
            IndexerClient::new(&config.indexer.url, config.indexer.timeout())
                .context("failed to build indexer client")?,
        ),
    };

    let view = build_view(source.as_ref(), height, &config.style)
        .with_context(|| format!("failed to build view for block {height}"))?;
    if view.status.is_degraded() {
        warn!("rendering an empty graph; the snapshot source was unavailable");
    }

    let output = match (&args.inspect, args.format) {
        (Some(query), _) => {
            let inspection = inspect_view(&view, query, &config.explorer.address_url)?
                .ok_or_else(|| anyhow!("no node or channel '{query}' in the view at block {height}"))?;
            serde_json::to_string_pretty(&inspection.to_json())?
        }
        (None, OutputFormat::Json) => serde_json::to_string_pretty(&view_json(&view))?,
        (None, OutputFormat::Html) => render_html(&view, &config.explorer.address_url),
    };

    write_output(args.out.as_deref(), &output)
}

fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(url) = &args.indexer_url {
        config.indexer.url = url.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.indexer.timeout_secs = timeout_secs;
    }
    config.validate()?;
    Ok(config)
}

/// Files are replaced whole, so a failed run never leaves a partial view behind.
fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    let Some(path) = path else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.write_all(b"\n")?;
        return Ok(());
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage output in {}", dir.display()))?;
    staged.write_all(output.as_bytes())?;
    staged
        .persist(path)
        .map_err(|error| error.error)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
