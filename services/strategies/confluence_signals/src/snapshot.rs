//! Indicator readings for one asset at evaluation time

use crate::config::{IndicatorParams, MIN_SHORT_SERIES_LEN};
use crate::error::Result;
use indicators::{
    bollinger_bands, detect_price_action, ema, fibonacci_levels, find_support_resistance, macd,
    rsi, BollingerValue, CandleSeries, FibonacciLevels, IndicatorValue, MacdValue,
    PriceActionResult, SrLevel,
};
use rust_decimal::Decimal;

/// Every raw indicator value the scorer reads
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    /// Last close of the long-timeframe series
    pub price: Decimal,
    pub rsi: Decimal,
    pub macd: MacdValue,
    pub bollinger: BollingerValue,
    pub ema_fast: Decimal,
    pub ema_slow: Decimal,
    pub support_resistance: Vec<SrLevel>,
    pub fibonacci: FibonacciLevels,
    pub price_action: PriceActionResult,
    /// Last volume over the trailing average; `None` when the average is zero
    pub volume_ratio: Option<Decimal>,
}

impl IndicatorSnapshot {
    /// Run the indicator library over both series.
    ///
    /// Fails with `InsufficientData` before any indicator runs if the long
    /// series is shorter than the configured periods require, or the short
    /// series has fewer than three bars.
    pub fn compute(
        long: &CandleSeries,
        short: &CandleSeries,
        params: &IndicatorParams,
    ) -> Result<Self> {
        long.ensure_len("long-timeframe series", params.min_long_series_len())?;
        short.ensure_len("short-timeframe series", MIN_SHORT_SERIES_LEN)?;

        let closes = long.closes();
        let volumes = long.volumes();
        let price = long.last().close;

        let fib_window = &closes[closes.len() - params.fib_lookback..];
        let volume_window = &volumes[volumes.len() - params.volume_lookback..];
        let avg_volume = volume_window
            .iter()
            .sum::<Decimal>()
            .checked_div(Decimal::from(params.volume_lookback));

        Ok(Self {
            price,
            rsi: rsi(&closes, params.rsi_period),
            macd: macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal),
            bollinger: bollinger_bands(&closes, params.bb_period, params.bb_multiplier)?,
            ema_fast: last_ema(&closes, params.ema_fast),
            ema_slow: last_ema(&closes, params.ema_slow),
            support_resistance: find_support_resistance(&closes, params.sr_cluster_threshold),
            fibonacci: fibonacci_levels(fib_window)?,
            price_action: detect_price_action(short.bars())?,
            volume_ratio: avg_volume.and_then(|avg| long.last().volume.checked_div(avg)),
        })
    }

    /// Readings as tagged values for diagnostics output
    pub fn values(&self) -> Vec<IndicatorValue> {
        let mut values = vec![
            IndicatorValue::Rsi { value: self.rsi },
            IndicatorValue::Macd(self.macd),
            IndicatorValue::Bollinger(self.bollinger),
            IndicatorValue::Fibonacci(self.fibonacci.clone()),
        ];
        values.extend(
            self.support_resistance
                .iter()
                .copied()
                .map(IndicatorValue::SupportResistance),
        );
        values.push(IndicatorValue::PriceAction(self.price_action));
        values
    }
}

fn last_ema(closes: &[Decimal], period: usize) -> Decimal {
    ema(closes, period).last().copied().unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use indicators::{Bar, CandlePattern, IndicatorError};
    use rust_decimal_macros::dec;

    fn series(closes: &[Decimal], volume: Decimal) -> CandleSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as u64 * 60_000, c, c, c, c, volume))
            .collect();
        CandleSeries::new(bars).unwrap()
    }

    fn ramp(len: usize) -> Vec<Decimal> {
        (0..len).map(|i| Decimal::from(100 + i as i64)).collect()
    }

    #[test]
    fn test_compute_rising_series() {
        let long = series(&ramp(100), dec!(1000));
        let short = series(&[dec!(10); 3], dec!(1));
        let snapshot = IndicatorSnapshot::compute(&long, &short, &IndicatorParams::default()).unwrap();

        assert_eq!(snapshot.price, dec!(199));
        assert!(snapshot.rsi > dec!(99));
        assert!(snapshot.price > snapshot.ema_fast);
        assert!(snapshot.ema_fast > snapshot.ema_slow);
        assert!(snapshot.support_resistance.is_empty());
        // Fibonacci window is the last 50 closes
        assert_eq!(snapshot.fibonacci.high, dec!(199));
        assert_eq!(snapshot.fibonacci.low, dec!(150));
        assert_eq!(snapshot.price_action.pattern, CandlePattern::NoClearPattern);
        assert_eq!(snapshot.volume_ratio, Some(dec!(1)));
    }

    #[test]
    fn test_compute_rejects_short_long_series() {
        let long = series(&ramp(49), dec!(1000));
        let short = series(&[dec!(10); 3], dec!(1));
        let err = IndicatorSnapshot::compute(&long, &short, &IndicatorParams::default()).unwrap_err();

        assert!(matches!(
            err,
            StrategyError::Indicator(IndicatorError::InsufficientData {
                required: 50,
                actual: 49,
                ..
            })
        ));
    }

    #[test]
    fn test_compute_rejects_short_price_action_series() {
        let long = series(&ramp(100), dec!(1000));
        let short = series(&[dec!(10); 2], dec!(1));

        let err = IndicatorSnapshot::compute(&long, &short, &IndicatorParams::default()).unwrap_err();

        assert!(matches!(
            err,
            StrategyError::Indicator(IndicatorError::InsufficientData {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_volume_lookback_has_no_ratio() {
        let long = series(&ramp(60), dec!(1000));
        let short = series(&[dec!(10); 3], dec!(1));
        let params = IndicatorParams {
            volume_lookback: 0,
            ..IndicatorParams::default()
        };
        let snapshot = IndicatorSnapshot::compute(&long, &short, &params).unwrap();

        assert_eq!(snapshot.volume_ratio, None);
    }

    #[test]
    fn test_zero_volume_has_no_ratio() {
        let long = series(&ramp(60), dec!(0));
        let short = series(&[dec!(10); 3], dec!(1));
        let snapshot = IndicatorSnapshot::compute(&long, &short, &IndicatorParams::default()).unwrap();

        assert_eq!(snapshot.volume_ratio, None);
    }
}
