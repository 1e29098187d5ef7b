//! Signal result definitions and batch statistics

use crate::scoring::Category;
use chrono::{DateTime, Utc};
use indicators::{Direction, IndicatorValue};
use serde::{Deserialize, Serialize};

/// Directional outcome of one evaluation
pub type SignalType = Direction;

/// Caller-supplied asset metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSpec {
    /// Display name, e.g. `BTC/USDT`
    pub name: String,
    /// Exchange symbol, e.g. `BTCUSDT`
    pub symbol: String,
}

impl AssetSpec {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Confirmed,
    Neutral,
    Warning,
    Rejected,
}

/// Human-readable finding for one indicator category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisEntry {
    pub indicator_name: String,
    pub description: String,
    pub status: AnalysisStatus,
}

impl AnalysisEntry {
    pub fn new(category: Category, description: impl Into<String>, status: AnalysisStatus) -> Self {
        Self {
            indicator_name: category.name().to_string(),
            description: description.into(),
            status,
        }
    }
}

/// Outcome of one engine invocation. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub asset: String,
    pub symbol: String,
    pub signal_type: SignalType,

    /// 50-95 numeric confidence
    pub confidence: u8,

    /// 0-5 star rating
    pub confidence_level: u8,

    pub confluence_count: usize,
    pub detected_confluences: Vec<Category>,
    pub missing_confluences: Vec<String>,
    pub analyses: Vec<AnalysisEntry>,
    pub has_signal: bool,

    /// Raw tallies the decision was taken from
    pub call_score: u32,
    pub put_score: u32,

    /// Indicator readings behind the analyses
    pub indicator_values: Vec<IndicatorValue>,

    pub timestamp: DateTime<Utc>,
}

impl SignalResult {
    /// Star rating as shown to the user, e.g. `★★★☆☆`
    pub fn stars(&self) -> String {
        let filled = usize::from(self.confidence_level.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// Signal generation statistics over a batch of evaluations
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SignalStats {
    pub total_evaluations: u64,
    pub call_signals: u64,
    pub put_signals: u64,
    pub no_signals: u64,
    /// Mean confidence of emitted signals only
    pub avg_confidence: f64,
    pub last_signal_timestamp: Option<DateTime<Utc>>,
}

impl SignalStats {
    /// Update stats with a new result
    pub fn record(&mut self, result: &SignalResult) {
        self.total_evaluations += 1;

        if !result.has_signal {
            self.no_signals += 1;
            return;
        }

        match result.signal_type {
            SignalType::Call => self.call_signals += 1,
            SignalType::Put => self.put_signals += 1,
            SignalType::Neutral => {}
        }

        // Update rolling average confidence
        let emitted = self.call_signals + self.put_signals;
        let total_confidence =
            self.avg_confidence * (emitted - 1) as f64 + f64::from(result.confidence);
        self.avg_confidence = total_confidence / emitted as f64;

        self.last_signal_timestamp = Some(result.timestamp);
    }

    pub fn emitted(&self) -> u64 {
        self.call_signals + self.put_signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(signal_type: SignalType, confidence: u8, has_signal: bool) -> SignalResult {
        SignalResult {
            asset: "BTC/USDT".to_string(),
            symbol: "BTCUSDT".to_string(),
            signal_type,
            confidence,
            confidence_level: if has_signal { 3 } else { 0 },
            confluence_count: if has_signal { 3 } else { 1 },
            detected_confluences: Vec::new(),
            missing_confluences: Vec::new(),
            analyses: Vec::new(),
            has_signal,
            call_score: 0,
            put_score: 0,
            indicator_values: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_signal_stats() {
        let mut stats = SignalStats::default();

        stats.record(&result(SignalType::Call, 80, true));
        stats.record(&result(SignalType::Put, 90, true));
        stats.record(&result(SignalType::Neutral, 50, false));

        assert_eq!(stats.total_evaluations, 3);
        assert_eq!(stats.call_signals, 1);
        assert_eq!(stats.put_signals, 1);
        assert_eq!(stats.no_signals, 1);
        assert_eq!(stats.emitted(), 2);
        assert_eq!(stats.avg_confidence, 85.0);
        assert!(stats.last_signal_timestamp.is_some());
    }

    #[test]
    fn test_stars() {
        assert_eq!(result(SignalType::Call, 95, true).stars(), "★★★☆☆");
        assert_eq!(result(SignalType::Neutral, 50, false).stars(), "☆☆☆☆☆");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(result(SignalType::Put, 75, true)).unwrap();

        assert_eq!(json["signalType"], "PUT");
        assert_eq!(json["confidenceLevel"], 3);
        assert_eq!(json["hasSignal"], true);
        assert!(json.get("missingConfluences").is_some());
    }
}
