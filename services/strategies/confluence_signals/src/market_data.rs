//! Kline sources
//!
//! Exchange REST klines arrive as JSON arrays
//! `[openTime, "open", "high", "low", "close", "volume", ...]`, oldest first.
//! Both sources parse that row format into [`Bar`]s; the file source reads
//! the same payload saved to disk so the service can run offline.

use crate::config::MarketDataConfig;
use crate::error::{Result, StrategyError};
use async_trait::async_trait;
use indicators::Bar;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Anything that can produce chronological bars for a symbol
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Bar>>;

    fn name(&self) -> &'static str;
}

/// Pick the file source when a data directory is configured, the exchange otherwise
pub fn source_from_config(config: &MarketDataConfig) -> Result<Arc<dyn MarketDataSource>> {
    match &config.data_dir {
        Some(dir) => Ok(Arc::new(FileKlineSource::new(dir))),
        None => Ok(Arc::new(BinanceKlineClient::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?)),
    }
}

/// Parse one kline row; prices and volume may be strings or numbers
pub fn parse_kline_row(row: &[Value]) -> Result<Bar> {
    if row.len() < 6 {
        return Err(StrategyError::market_data(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let time = row[0]
        .as_u64()
        .ok_or_else(|| StrategyError::market_data(format!("invalid kline open time: {}", row[0])))?;

    Ok(Bar::new(
        time,
        decimal_field(&row[1], "open")?,
        decimal_field(&row[2], "high")?,
        decimal_field(&row[3], "low")?,
        decimal_field(&row[4], "close")?,
        decimal_field(&row[5], "volume")?,
    ))
}

pub fn parse_kline_rows(rows: &[Vec<Value>]) -> Result<Vec<Bar>> {
    rows.iter().map(|row| parse_kline_row(row)).collect()
}

fn decimal_field(value: &Value, field: &str) -> Result<Decimal> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(StrategyError::market_data(format!(
                "kline {} is not numeric: {}",
                field, other
            )))
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| StrategyError::market_data(format!("kline {} '{}': {}", field, text, e)))
}

/// Exchange REST client, one request per call and no retries
#[derive(Debug, Clone)]
pub struct BinanceKlineClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceKlineClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StrategyError::market_data(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MarketDataSource for BinanceKlineClient {
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Bar>> {
        let url = format!("{}/klines", self.base_url);
        debug!(%symbol, %interval, limit, "Fetching klines");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| StrategyError::market_data(format!("{} {}: {}", symbol, interval, e)))?;

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| StrategyError::market_data(format!("{} {}: {}", symbol, interval, e)))?;

        parse_kline_rows(&rows)
    }

    fn name(&self) -> &'static str {
        "binance"
    }
}

/// Reads `{dir}/{symbol}_{interval}.json` files holding kline rows
#[derive(Debug, Clone)]
pub struct FileKlineSource {
    dir: PathBuf,
}

impl FileKlineSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, symbol: &str, interval: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.json", symbol, interval))
    }
}

#[async_trait]
impl MarketDataSource for FileKlineSource {
    async fn klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Bar>> {
        let path = self.path_for(symbol, interval);
        debug!(path = %path.display(), limit, "Reading klines");

        let raw = tokio::fs::read_to_string(&path).await?;
        let rows: Vec<Vec<Value>> = serde_json::from_str(&raw).map_err(|e| {
            StrategyError::market_data(format!("{}: {}", path.display(), e))
        })?;

        // Keep the most recent `limit` rows, like the exchange endpoint
        let start = rows.len().saturating_sub(limit);
        parse_kline_rows(&rows[start..])
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn row(value: Value) -> Vec<Value> {
        value.as_array().unwrap().clone()
    }

    #[test]
    fn test_parse_string_row() {
        let bar = parse_kline_row(&row(json!([
            1700000000000u64,
            "37000.10",
            "37100.00",
            "36950.5",
            "37050.25",
            "12.5",
            1700000059999u64,
            "463000.0"
        ])))
        .unwrap();

        assert_eq!(bar.time, 1_700_000_000_000);
        assert_eq!(bar.open, dec!(37000.10));
        assert_eq!(bar.low, dec!(36950.5));
        assert_eq!(bar.close, dec!(37050.25));
        assert_eq!(bar.volume, dec!(12.5));
    }

    #[test]
    fn test_parse_numeric_row() {
        let bar = parse_kline_row(&row(json!([60000, 1.5, 2, 1, 1.75, 300]))).unwrap();

        assert_eq!(bar.high, dec!(2));
        assert_eq!(bar.close, dec!(1.75));
    }

    #[test]
    fn test_parse_rejects_malformed_rows() {
        let short = parse_kline_row(&row(json!([60000, "1", "2", "0.5", "1.5"])));
        assert!(matches!(short, Err(StrategyError::MarketData { .. })));

        let bad_price = parse_kline_row(&row(json!([60000, "abc", "2", "0.5", "1.5", "10"])));
        assert!(matches!(bad_price, Err(StrategyError::MarketData { .. })));

        let bad_time = parse_kline_row(&row(json!(["soon", "1", "2", "0.5", "1.5", "10"])));
        assert!(matches!(bad_time, Err(StrategyError::MarketData { .. })));

        let null_volume = parse_kline_row(&row(json!([60000, "1", "2", "0.5", "1.5", null])));
        assert!(matches!(null_volume, Err(StrategyError::MarketData { .. })));
    }

    #[tokio::test]
    async fn test_file_source_keeps_latest_rows() {
        let dir = tempfile::tempdir().unwrap();
        let rows: Vec<Value> = (0..10u64)
            .map(|i| json!([i * 60_000, "1", "2", "0.5", (i + 1).to_string(), "10"]))
            .collect();
        std::fs::write(
            dir.path().join("BTCUSDT_1m.json"),
            serde_json::to_string(&rows).unwrap(),
        )
        .unwrap();

        let source = FileKlineSource::new(dir.path());
        let bars = source.klines("BTCUSDT", "1m", 4).await.unwrap();

        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].close, dec!(7));
        assert_eq!(bars[3].close, dec!(10));
        assert_eq!(source.name(), "file");
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileKlineSource::new(dir.path());

        let err = source.klines("ETHUSDT", "1h", 100).await.unwrap_err();
        assert!(matches!(err, StrategyError::Io(_)));
    }

    #[test]
    fn test_source_from_config() {
        let mut config = MarketDataConfig::default();
        assert_eq!(source_from_config(&config).unwrap().name(), "binance");

        config.data_dir = Some(PathBuf::from("data"));
        assert_eq!(source_from_config(&config).unwrap().name(), "file");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client =
            BinanceKlineClient::new("https://api.binance.com/api/v3/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "https://api.binance.com/api/v3");
    }
}
