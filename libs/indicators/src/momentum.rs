//! Momentum oscillators: RSI and MACD

use crate::moving_average::ema;
use crate::value::MacdValue;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;

const NEUTRAL_RSI: Decimal = dec!(50);
const RS_CAP: Decimal = dec!(100);

/// Relative Strength Index with Wilder smoothing.
///
/// Average gain/loss are seeded with the plain mean of the first `period`
/// deltas; every later delta is folded in as `(avg * (period - 1) + x) / period`.
/// A zero average loss caps RS at 100. Returns 50 when the series is too short
/// to produce a single smoothed value (fewer than `period + 2` closes).
pub fn rsi(series: &[Decimal], period: usize) -> Decimal {
    if period == 0 || series.len() < period + 2 {
        return NEUTRAL_RSI;
    }

    let deltas: Vec<Decimal> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let gain = |d: Decimal| d.max(Decimal::ZERO);
    let loss = |d: Decimal| (-d).max(Decimal::ZERO);

    let period_d = Decimal::from(period);
    let period_minus_1 = Decimal::from(period - 1);

    let mut avg_gain = deltas[..period].iter().copied().map(gain).sum::<Decimal>() / period_d;
    let mut avg_loss = deltas[..period].iter().copied().map(loss).sum::<Decimal>() / period_d;

    let mut value = NEUTRAL_RSI;
    for &delta in &deltas[period..] {
        avg_gain = (avg_gain * period_minus_1 + gain(delta)) / period_d;
        avg_loss = (avg_loss * period_minus_1 + loss(delta)) / period_d;

        let rs = if avg_loss.is_zero() {
            RS_CAP
        } else {
            // A vanishing loss average overflows the ratio; treat it like zero loss
            avg_gain.checked_div(avg_loss).unwrap_or(RS_CAP)
        };
        value = dec!(100) - dec!(100) / (dec!(1) + rs);
    }

    value
}

/// Moving Average Convergence Divergence.
///
/// Both EMAs span the whole input, so the fast EMA is read `slow - fast` bars
/// ahead of the slow one: `line[i] = fast[i + Δ] - slow[i]`, built only where
/// `i + Δ` is in range. The signal line is the EMA of that line and the
/// histogram is taken over the trailing overlap of the two. Components that
/// cannot be computed (series no longer than Δ) default to zero.
pub fn macd(series: &[Decimal], fast: usize, slow: usize, signal_period: usize) -> MacdValue {
    let offset = slow.saturating_sub(fast);
    let fast_ema = ema(series, fast);
    let slow_ema = ema(series, slow);

    let macd_line: Vec<Decimal> = slow_ema
        .iter()
        .zip(fast_ema.iter().skip(offset))
        .map(|(slow_value, fast_value)| fast_value - slow_value)
        .collect();

    let signal_line = ema(&macd_line, signal_period);

    match (macd_line.last(), signal_line.last()) {
        (Some(&macd), Some(&signal)) => MacdValue {
            macd,
            signal,
            histogram: macd - signal,
        },
        _ => MacdValue::default(),
    }
}
