//! Batch evaluation over a watchlist
//!
//! Fetches both series per asset from a [`MarketDataSource`] and runs the
//! engine on the blocking pool, one task per asset. A failure for one asset
//! is reported in its slot and does not stop the others.

use crate::config::MarketDataConfig;
use crate::error::{Result, StrategyError};
use crate::market_data::MarketDataSource;
use crate::signals::{AssetSpec, SignalResult};
use crate::strategy::ConfluenceSignalEngine;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SignalService {
    engine: Arc<ConfluenceSignalEngine>,
    source: Arc<dyn MarketDataSource>,
    market_data: MarketDataConfig,
}

impl SignalService {
    pub fn new(engine: ConfluenceSignalEngine, source: Arc<dyn MarketDataSource>) -> Self {
        let market_data = engine.config().market_data.clone();
        Self {
            engine: Arc::new(engine),
            source,
            market_data,
        }
    }

    pub fn engine(&self) -> &ConfluenceSignalEngine {
        &self.engine
    }

    /// Fetch and evaluate one asset
    pub async fn evaluate_asset(&self, asset: &AssetSpec) -> Result<SignalResult> {
        let md = &self.market_data;
        let (long, short) = tokio::try_join!(
            self.source
                .klines(&asset.symbol, &md.long_interval, md.long_limit),
            self.source
                .klines(&asset.symbol, &md.short_interval, md.short_limit),
        )?;
        debug!(
            asset = %asset.name,
            source = self.source.name(),
            long_bars = long.len(),
            short_bars = short.len(),
            "Fetched series"
        );

        let engine = Arc::clone(&self.engine);
        let asset = asset.clone();
        tokio::task::spawn_blocking(move || engine.evaluate_bars(&asset, long, short))
            .await
            .map_err(|e| StrategyError::calculation(format!("evaluation task failed: {}", e)))?
    }

    /// Evaluate every asset concurrently; results keep the input order
    pub async fn evaluate_all(
        self: &Arc<Self>,
        assets: &[AssetSpec],
    ) -> Vec<(AssetSpec, Result<SignalResult>)> {
        let handles: Vec<_> = assets
            .iter()
            .cloned()
            .map(|asset| {
                let service = Arc::clone(self);
                tokio::spawn(async move {
                    let result = service.evaluate_asset(&asset).await;
                    (asset, result)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, asset) in handles.into_iter().zip(assets) {
            match handle.await {
                Ok(entry) => results.push(entry),
                Err(e) => {
                    warn!(asset = %asset.name, "Evaluation task panicked: {}", e);
                    results.push((
                        asset.clone(),
                        Err(StrategyError::calculation(format!("task failed: {}", e))),
                    ));
                }
            }
        }
        results
    }
}

/// Narrow the watchlist to the requested symbols, or to one random asset.
///
/// Unknown symbols are evaluated with the symbol as display name.
pub fn select_assets(watchlist: &[AssetSpec], symbols: &[String], random: bool) -> Vec<AssetSpec> {
    if random {
        let pool = if symbols.is_empty() {
            watchlist.to_vec()
        } else {
            select_assets(watchlist, symbols, false)
        };
        return pool
            .choose(&mut rand::thread_rng())
            .cloned()
            .into_iter()
            .collect();
    }

    if symbols.is_empty() {
        return watchlist.to_vec();
    }

    symbols
        .iter()
        .map(|symbol| {
            let symbol = symbol.to_uppercase();
            watchlist
                .iter()
                .find(|asset| asset.symbol == symbol)
                .cloned()
                .unwrap_or_else(|| AssetSpec::new(symbol.clone(), symbol))
        })
        .collect()
}
