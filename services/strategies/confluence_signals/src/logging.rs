//! Tracing setup for the service binary

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset, e.g. `confluence_signals=info,warn`
pub fn default_filter(level: &str) -> String {
    format!("confluence_signals={level},indicators={level},warn")
}

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_strategy_logging(service_name: &str, level: &str, json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let registry = tracing_subscriber::registry().with(filter);

    let initialized = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    initialized.map_err(|e| anyhow!("Failed to initialize logging for {}: {}", service_name, e))?;

    tracing::debug!(service = service_name, json, "Logging initialized");
    Ok(())
}
