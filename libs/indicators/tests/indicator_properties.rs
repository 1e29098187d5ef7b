//! Indicator Property Tests
//!
//! Mathematical properties that must hold for any well-formed input series,
//! regardless of the specific prices involved.

use indicators::{
    bollinger_bands, detect_price_action, ema, find_support_resistance, rsi, Bar, CandlePattern,
    LevelKind, DEFAULT_RSI_PERIOD,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

prop_compose! {
    fn price()
        (cents in 100i64..10_000_000i64) -> Decimal {
        Decimal::new(cents, 2)
    }
}

prop_compose! {
    fn price_series(min_len: usize, max_len: usize)
        (values in prop::collection::vec(price(), min_len..max_len)) -> Vec<Decimal> {
        values
    }
}

prop_compose! {
    fn ohlc_bar()
        (open in price(), close in price(), up in 0i64..50_000i64, down in 0i64..50_000i64) -> Bar {
        let high = open.max(close) + Decimal::new(up, 2);
        let low = (open.min(close) - Decimal::new(down, 2)).max(dec!(0.01));
        Bar::new(0, open, high, low, close, dec!(1))
    }
}

proptest! {
    #[test]
    fn rsi_stays_within_bounds(series in price_series(0, 120)) {
        let value = rsi(&series, DEFAULT_RSI_PERIOD);
        prop_assert!(value >= dec!(0));
        prop_assert!(value <= dec!(100));
    }

    #[test]
    fn rsi_of_rising_series_is_near_cap(start in 1i64..100_000, step in 1i64..500, len in 16usize..120) {
        let series: Vec<Decimal> = (0..len as i64).map(|i| Decimal::from(start + step * i)).collect();
        let value = rsi(&series, DEFAULT_RSI_PERIOD);

        prop_assert!(value > dec!(99));
        prop_assert!(value < dec!(100));
    }

    #[test]
    fn ema_with_period_one_is_identity(series in price_series(0, 80)) {
        prop_assert_eq!(ema(&series, 1), series);
    }

    #[test]
    fn ema_preserves_length(series in price_series(0, 80), period in 1usize..60) {
        prop_assert_eq!(ema(&series, period).len(), series.len());
    }

    #[test]
    fn bollinger_bands_are_ordered(series in price_series(20, 100), multiplier in 0i64..400) {
        let bands = bollinger_bands(&series, 20, Decimal::new(multiplier, 2)).unwrap();

        prop_assert!(bands.upper >= bands.middle);
        prop_assert!(bands.middle >= bands.lower);
    }

    #[test]
    fn support_resistance_levels_are_local_extrema(series in price_series(0, 100)) {
        // zero threshold disables merging, so every level is a raw candidate
        let levels = find_support_resistance(&series, dec!(0));

        for level in levels {
            let is_extremum = (2..series.len().saturating_sub(2)).any(|i| {
                let neighbours = [series[i - 2], series[i - 1], series[i + 1], series[i + 2]];
                series[i] == level.price
                    && match level.kind {
                        LevelKind::Resistance => neighbours.iter().all(|&n| series[i] > n),
                        LevelKind::Support => neighbours.iter().all(|&n| series[i] < n),
                    }
            });
            prop_assert!(is_extremum, "{:?} is not a local extremum", level);
            prop_assert_eq!(level.strength, 1);
        }
    }

    #[test]
    fn price_action_reports_exactly_one_pattern(bars in prop::collection::vec(ohlc_bar(), 3..8)) {
        let result = detect_price_action(&bars).unwrap();

        prop_assert_eq!(
            CandlePattern::ALL.iter().filter(|&&p| p == result.pattern).count(),
            1
        );
        prop_assert_eq!(result.direction, result.pattern.direction());
        prop_assert_eq!(result.strength, result.pattern.strength());
    }
}
