//! Confluence Signals Service Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use confluence_signals::config::{resolve_config_path, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use confluence_signals::logging::init_strategy_logging;
use confluence_signals::market_data::source_from_config;
use confluence_signals::{
    select_assets, ConfluenceSignalEngine, SignalEngineConfig, SignalService, SignalStats,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "confluence_signals")]
#[command(about = "Multi-indicator confluence signals for crypto pairs")]
struct Cli {
    /// Configuration file (defaults to $CONFLUENCE_SIGNALS_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exchange symbols to evaluate, e.g. BTCUSDT (defaults to the watchlist)
    #[arg(short, long = "symbol")]
    symbols: Vec<String>,

    /// Evaluate one randomly chosen asset
    #[arg(long)]
    random: bool,

    /// Read `{symbol}_{interval}.json` kline files instead of the exchange
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Pretty-print result JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| resolve_config_path(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH));
    let (mut config, origin) = SignalEngineConfig::load_with_origin(Some(&config_path))
        .context("Failed to load confluence strategy configuration")?;
    if cli.data_dir.is_some() {
        config.market_data.data_dir = cli.data_dir.clone();
    }

    init_strategy_logging("confluence_signals", &config.log_level, config.json_logs)?;
    info!("Starting Confluence Signals Strategy");
    origin.log();

    let assets = select_assets(&config.assets, &cli.symbols, cli.random);
    if assets.is_empty() {
        warn!("No assets to evaluate");
        return Ok(());
    }

    let source = source_from_config(&config.market_data)
        .context("Failed to create market data source")?;
    info!(
        source = source.name(),
        assets = assets.len(),
        "Evaluating assets"
    );

    let engine = ConfluenceSignalEngine::new(config).context("Invalid engine configuration")?;
    let service = Arc::new(SignalService::new(engine, source));

    let mut stats = SignalStats::default();
    let mut failures = 0usize;
    for (asset, outcome) in service.evaluate_all(&assets).await {
        match outcome {
            Ok(result) => {
                stats.record(&result);
                let json = if cli.pretty {
                    serde_json::to_string_pretty(&result)
                } else {
                    serde_json::to_string(&result)
                }
                .context("Failed to serialize signal result")?;
                println!("{}", json);
            }
            Err(e) => {
                failures += 1;
                warn!(asset = %asset.name, "Evaluation failed: {}", e);
            }
        }
    }

    info!(
        evaluated = stats.total_evaluations,
        call = stats.call_signals,
        put = stats.put_signals,
        none = stats.no_signals,
        failed = failures,
        avg_confidence = stats.avg_confidence,
        "Batch complete"
    );

    Ok(())
}
