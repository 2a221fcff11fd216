use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use steam_listing::{
    config::{Config, ConfigError},
    description::DescriptionOptions,
    steam::ItemSource,
    Listing, ListingBuilder, Metrics,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Builds marketplace listings from already-fetched Steam items
#[derive(Parser)]
#[command(name = "steam-listing")]
#[command(version)]
struct Cli {
    /// JSON file with an item, a list of items, or an inventory page
    input: PathBuf,
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Owner SteamID64 for items that do not name one
    #[arg(long)]
    owner: Option<String>,
    /// Append a tag summary line to every description
    #[arg(long)]
    tag_summary: bool,
    /// Write Prometheus metrics to this file when done
    #[arg(long)]
    metrics_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decoding items")]
    Json(#[from] serde_json::Error),
    #[error("metrics")]
    Metrics(#[from] prometheus::Error),
    #[error("installing tracing subscriber")]
    Tracing(#[from] tracing::subscriber::SetGlobalDefaultError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            tracing::warn!(failed, "Some items could not be listed");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("{:?}", e);
            eprintln!("steam-listing: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<usize, CliError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_deref().unwrap_or("info")));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Starting");

    let registry = prometheus::Registry::new();
    let metrics = Metrics::new(&registry)?;

    let raw = std::fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let items = ItemSource::from_value(serde_json::from_str(&raw)?)?.into_items();

    tracing::info!(count = items.len(), "Loaded items");

    let owner = cli.owner.as_deref().or(config.owner_steamid.as_deref());
    let builder = ListingBuilder::new().options(DescriptionOptions {
        tag_summary: cli.tag_summary || config.tag_summary,
    });

    let start_time = std::time::Instant::now();

    let mut listings: Vec<Listing> = Vec::with_capacity(items.len());
    let mut failed = 0;
    for (i, item) in items.iter().enumerate() {
        let _entered = tracing::info_span!("Item", current = i + 1, total_items = items.len()).entered();

        match builder.build(item, Some(&config.overlay), owner) {
            Ok(listing) => {
                metrics.record_built(item);
                listings.push(listing);
            }
            Err(e) => {
                tracing::error!("Building listing {:?}", e);
                metrics.record_failure(item);
                failed += 1;
            }
        }
    }

    let elapsed = start_time.elapsed();
    tracing::info!(built = listings.len(), failed, "Done, took {:?}", elapsed);

    println!("{}", serde_json::to_string_pretty(&listings)?);

    if let Some(path) = cli.metrics_file.or(config.metrics_file) {
        metrics.set_last_run(chrono::Utc::now().timestamp());

        let text = steam_listing::metrics::encode(&registry)?;
        std::fs::write(&path, text).map_err(|source| CliError::Write { path, source })?;
    }

    Ok(failed)
}
