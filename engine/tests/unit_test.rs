//! Unit tests for trade-engine modules

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use trade_engine::data::{Instrument, PriceBar, PriceSeries};
    use trade_engine::error::{ErrorCategory, ExchangeError, LedgerError, TradeError};
    use trade_engine::indicators::{
        calculate_ema, calculate_macd, calculate_rsi, latest_rsi, Indicator, IndicatorParams,
        IndicatorSnapshot, EMA, MACD, RSI, SMA,
    };
    use trade_engine::portfolio::PositionLedger;

    fn wave(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn test_price_series_orders_bars() {
        let now = Utc::now();
        let bars = vec![
            PriceBar::new(now, 10.0, 12.0, 9.0, 11.0, 1.0),
            PriceBar::new(now - Duration::minutes(5), 9.0, 10.0, 8.0, 10.0, 1.0),
            PriceBar::new(now - Duration::minutes(10), 8.0, 9.0, 7.5, 9.0, 1.0),
        ];
        let series = PriceSeries::new(bars);
        assert_eq!(series.closes(), vec![9.0, 10.0, 11.0]);
        assert_eq!(series.recent_low(2), Some(8.0));
        assert_eq!(series.recent_low(10), Some(7.5));
        assert_eq!(PriceSeries::new(Vec::new()).recent_low(20), None);
    }

    #[test]
    fn test_indicator_wrappers() {
        let mut rsi = RSI::new(14).unwrap();
        assert_eq!(rsi.name(), "RSI");
        assert!(!rsi.is_ready());
        let mut ema = EMA::new(10).unwrap();
        let mut sma = SMA::new(10).unwrap();
        let mut macd = MACD::new(12, 26, 9).unwrap();

        for value in wave(60) {
            rsi.update(value);
            ema.update(value);
            sma.update(value);
            macd.update(value);
        }

        assert!(rsi.is_ready());
        assert!(ema.is_ready());
        assert!(sma.is_ready());
        assert!(macd.is_ready());
        assert!(macd.histogram().is_some());
        assert!(RSI::new(0).is_err());
    }

    #[test]
    fn test_ema_length_and_seed() {
        let values = wave(30);
        let ema = calculate_ema(&values, 9).unwrap();
        assert_eq!(ema.len(), values.len());
        assert_eq!(ema[0], values[0]);
    }

    #[test]
    fn test_rsi_bounds() {
        let rsi = calculate_rsi(&wave(100), 14).unwrap();
        for value in rsi.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
        let rising: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        assert_eq!(latest_rsi(&rising, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_macd_histogram_is_exact_difference() {
        let series = calculate_macd(&wave(80), 12, 26, 9).unwrap();
        for i in 0..series.len() {
            assert_eq!(series.histogram[i], series.macd[i] - series.signal[i]);
        }
    }

    #[test]
    fn test_snapshot_with_short_series() {
        let now = Utc::now();
        let bars: Vec<PriceBar> = wave(40)
            .into_iter()
            .enumerate()
            .map(|(i, c)| PriceBar::new(now + Duration::minutes(i as i64), c, c, c, c, 1.0))
            .collect();
        let snapshot =
            IndicatorSnapshot::compute(&PriceSeries::new(bars), &IndicatorParams::default()).unwrap();
        assert!(snapshot.trend_average().is_err());
        assert!(snapshot.macd().is_ok());
        assert!(snapshot.rsi().is_ok());
    }

    #[test]
    fn test_ledger_double_open_and_stray_close() {
        let btc = Instrument::new("KRW-BTC").unwrap();
        let mut ledger = PositionLedger::new();

        assert_eq!(ledger.close(&btc), Err(LedgerError::NotOpen(btc.clone())));
        ledger.open(&btc, 100.0, 10_000.0, 95.0, 110.0).unwrap();
        assert_eq!(
            ledger.open(&btc, 101.0, 10_000.0, 95.0, 110.0).unwrap_err(),
            LedgerError::AlreadyOpen(btc.clone())
        );

        let closed = ledger.close(&btc).unwrap();
        assert_eq!(closed.realized_percent(107.456), 7.46);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_error_categories() {
        let state: TradeError = LedgerError::NotOpen(Instrument::new("KRW-BTC").unwrap()).into();
        assert_eq!(state.category(), ErrorCategory::State);

        let funds = TradeError::from_order(ExchangeError::InsufficientFunds("bid".into()));
        assert_eq!(funds.category(), ErrorCategory::Order);

        let network: TradeError = ExchangeError::RateLimited("429".into()).into();
        assert_eq!(network.category(), ErrorCategory::Network);

        let balance = TradeError::from_balance(ExchangeError::Auth("jwt".into()));
        assert_eq!(balance.category(), ErrorCategory::Balance);
    }
}
