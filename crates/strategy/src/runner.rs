use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use common::{Bar, Error, Result, Signal, SignalEvent};

use crate::evaluator::{evaluate, IndicatorValues};
use crate::indicators::{MacdIndicator, RsiIndicator, SmaIndicator};
use crate::kind::StrategyKind;
use crate::registry::StrategyRegistry;

/// User input for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Ticker the bars belong to. Echoed back, never looked up.
    pub symbol: String,
    /// Starting cash. Validated and echoed; no portfolio is simulated.
    pub cash: f64,
    /// Inclusive lower bound on bar dates.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on bar dates.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Display name of the strategy. Unknown names run Buy and Hold.
    #[serde(default)]
    pub strategy: String,
    /// Daily bars, oldest first.
    pub bars: Vec<Bar>,
}

/// Outcome of a run: every Buy/Sell step plus per-signal totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub run_id: Uuid,
    pub symbol: String,
    pub requested_strategy: String,
    pub strategy: String,
    /// Resolved strategy type and the parameters it ran with.
    pub parameters: StrategyKind,
    pub initial_cash: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub signals: Vec<SignalEvent>,
    pub buy_count: usize,
    pub sell_count: usize,
    pub hold_count: usize,
}

impl BacktestRequest {
    /// Reject input the run cannot start from.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::InvalidInput("symbol must not be empty".into()));
        }
        if !self.cash.is_finite() || self.cash <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "cash must be a positive amount, got {}",
                self.cash
            )));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(Error::InvalidInput(format!(
                    "start_date {start} is after end_date {end}"
                )));
            }
        }
        if let Some(bar) = self.bars.iter().find(|b| !b.close.is_finite() || b.close <= 0.0) {
            return Err(Error::InvalidInput(format!(
                "close on {} must be a positive number, got {}",
                bar.date, bar.close
            )));
        }
        if let Some(w) = self.bars.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(Error::InvalidInput(format!(
                "bars must be in strictly ascending date order ({} then {})",
                w[0].date, w[1].date
            )));
        }
        Ok(())
    }

    /// Bars inside the requested date range.
    pub fn bars_in_range(&self) -> Vec<Bar> {
        self.bars
            .iter()
            .filter(|b| self.start_date.map_or(true, |s| b.date >= s))
            .filter(|b| self.end_date.map_or(true, |e| b.date <= e))
            .copied()
            .collect()
    }
}

/// Validate the request, resolve the strategy and classify every bar.
pub fn run_backtest(registry: &StrategyRegistry, request: &BacktestRequest) -> Result<BacktestReport> {
    request.validate()?;

    let bars = request.bars_in_range();
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Err(Error::InvalidInput("no bars in the requested date range".into()));
    };
    let (start_date, end_date) = (first.date, last.date);

    let kind = registry.resolve(&request.strategy);
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let signals = signal_series(&kind, &closes);

    let mut report = BacktestReport {
        run_id: Uuid::new_v4(),
        symbol: request.symbol.trim().to_string(),
        requested_strategy: request.strategy.clone(),
        strategy: kind.display_name().to_string(),
        parameters: kind,
        initial_cash: request.cash,
        start_date,
        end_date,
        bar_count: bars.len(),
        signals: Vec::new(),
        buy_count: 0,
        sell_count: 0,
        hold_count: 0,
    };

    for (bar, signal) in bars.iter().zip(signals) {
        match signal {
            Signal::Buy => report.buy_count += 1,
            Signal::Sell => report.sell_count += 1,
            Signal::Hold => report.hold_count += 1,
        }
        if signal.is_actionable() {
            debug!(date = %bar.date, close = bar.close, signal = %signal, "Signal");
            report.signals.push(SignalEvent {
                date: bar.date,
                close: bar.close,
                signal,
            });
        }
    }

    info!(
        run_id = %report.run_id,
        symbol = %report.symbol,
        strategy = %report.strategy,
        bars = report.bar_count,
        buys = report.buy_count,
        sells = report.sell_count,
        "Backtest complete"
    );
    Ok(report)
}

/// Compute the readings `strategy` needs, one entry per close.
pub fn indicator_series(strategy: &StrategyKind, closes: &[f64]) -> Vec<IndicatorValues> {
    let mut values = vec![IndicatorValues::default(); closes.len()];
    match strategy {
        StrategyKind::BuyAndHold => {}
        StrategyKind::MaCrossover(p) => {
            let fast = SmaIndicator::new(p.fast_period).series(closes);
            let slow = SmaIndicator::new(p.slow_period).series(closes);
            for ((v, f), s) in values.iter_mut().zip(fast).zip(slow) {
                v.fast_ma = f;
                v.slow_ma = s;
            }
        }
        StrategyKind::Rsi(p) => {
            let rsi = RsiIndicator::new(p.period).series(closes);
            for (v, r) in values.iter_mut().zip(rsi) {
                v.rsi = r;
            }
        }
        StrategyKind::Macd(p) => {
            let histo = MacdIndicator::new(p.fast_period, p.slow_period, p.signal_period)
                .histogram(closes);
            for (v, h) in values.iter_mut().zip(histo) {
                v.macd_histo = h;
            }
        }
    }
    values
}

/// Run the evaluator over a close series in chronological order.
pub fn signal_series(strategy: &StrategyKind, closes: &[f64]) -> Vec<Signal> {
    let values = indicator_series(strategy, closes);
    values
        .iter()
        .enumerate()
        .map(|(t, current)| {
            let previous = t.checked_sub(1).map(|p| &values[p]);
            evaluate(strategy, current, previous)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{MaCrossoverParams, RsiParams};

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(n as u64)
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(day(i as u32), c))
            .collect()
    }

    fn request(strategy: &str, closes: &[f64]) -> BacktestRequest {
        BacktestRequest {
            symbol: "AAPL".into(),
            cash: 10_000.0,
            start_date: None,
            end_date: None,
            strategy: strategy.into(),
            bars: bars(closes),
        }
    }

    fn registry_with_short_ma() -> StrategyRegistry {
        let file = crate::StrategyFileConfig::parse(
            "[[strategy]]\ntype = \"ma_crossover\"\n[strategy.params]\nfast_period = 1\nslow_period = 3\n",
        )
        .unwrap();
        StrategyRegistry::from_config(&file).unwrap()
    }

    #[test]
    fn ma_crossover_signals_on_the_cross_bars() {
        let kind = StrategyKind::MaCrossover(MaCrossoverParams { fast_period: 1, slow_period: 3 });
        // slow SMA(3) from index 2: 10, 10, 12, 10, 8
        let closes = [10.0, 10.0, 10.0, 10.0, 16.0, 4.0, 4.0];
        let signals = signal_series(&kind, &closes);
        assert_eq!(
            signals,
            vec![
                Signal::Hold,
                Signal::Hold,
                Signal::Hold,
                Signal::Hold,
                Signal::Buy,
                Signal::Sell,
                Signal::Hold,
            ]
        );
    }

    #[test]
    fn rsi_strategy_buys_in_a_selloff() {
        let kind = StrategyKind::Rsi(RsiParams { period: 3, ..RsiParams::default() });
        let closes = [20.0, 19.0, 18.0, 17.0, 16.0];
        let signals = signal_series(&kind, &closes);
        assert_eq!(&signals[..3], &[Signal::Hold; 3]);
        assert_eq!(signals[3], Signal::Buy);
        assert_eq!(signals[4], Signal::Buy);
    }

    #[test]
    fn buy_and_hold_report_has_no_signals() {
        let registry = StrategyRegistry::default();
        let report = run_backtest(&registry, &request("Buy and Hold", &[1.0, 2.0, 3.0])).unwrap();
        assert!(report.signals.is_empty());
        assert_eq!(report.hold_count, 3);
        assert_eq!(report.bar_count, 3);
        assert_eq!(report.strategy, "Buy and Hold");
    }

    #[test]
    fn unknown_strategy_runs_buy_and_hold() {
        let registry = StrategyRegistry::default();
        let report = run_backtest(&registry, &request("Nonexistent", &[5.0, 1.0, 9.0])).unwrap();
        assert_eq!(report.requested_strategy, "Nonexistent");
        assert_eq!(report.strategy, "Buy and Hold");
        assert_eq!(report.parameters, StrategyKind::BuyAndHold);
        assert_eq!(report.buy_count + report.sell_count, 0);
    }

    #[test]
    fn report_lists_actionable_steps_with_dates() {
        let registry = registry_with_short_ma();
        let report = run_backtest(
            &registry,
            &request("Moving Average Crossover", &[10.0, 10.0, 10.0, 10.0, 16.0, 4.0, 4.0]),
        )
        .unwrap();

        assert_eq!(report.buy_count, 1);
        assert_eq!(report.sell_count, 1);
        assert_eq!(report.hold_count, 5);
        assert_eq!(
            report.signals,
            vec![
                SignalEvent { date: day(4), close: 16.0, signal: Signal::Buy },
                SignalEvent { date: day(5), close: 4.0, signal: Signal::Sell },
            ]
        );
        assert!((report.initial_cash - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn date_range_filters_before_indicators() {
        let registry = StrategyRegistry::default();
        let mut req = request("Buy and Hold", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        req.start_date = Some(day(1));
        req.end_date = Some(day(3));

        let report = run_backtest(&registry, &req).unwrap();
        assert_eq!(report.bar_count, 3);
        assert_eq!(report.start_date, day(1));
        assert_eq!(report.end_date, day(3));
    }

    #[test]
    fn empty_range_is_rejected() {
        let registry = StrategyRegistry::default();
        let mut req = request("Buy and Hold", &[1.0, 2.0]);
        req.start_date = Some(day(10));
        assert!(matches!(run_backtest(&registry, &req), Err(Error::InvalidInput(_))));

        let req = request("Buy and Hold", &[]);
        assert!(matches!(run_backtest(&registry, &req), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn validate_rejects_bad_input() {
        let mut req = request("RSI Strategy", &[1.0, 2.0]);
        req.cash = 0.0;
        assert!(req.validate().is_err());

        let mut req = request("RSI Strategy", &[1.0, 2.0]);
        req.cash = f64::INFINITY;
        assert!(req.validate().is_err());

        let mut req = request("RSI Strategy", &[1.0, 2.0]);
        req.symbol = "  ".into();
        assert!(req.validate().is_err());

        let mut req = request("RSI Strategy", &[1.0, 2.0]);
        req.start_date = Some(day(5));
        req.end_date = Some(day(1));
        assert!(req.validate().is_err());

        let req = request("RSI Strategy", &[1.0, f64::NAN]);
        assert!(req.validate().is_err());

        let req = request("RSI Strategy", &[1.0, -2.0]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn validate_rejects_unordered_or_duplicate_dates() {
        let mut req = request("RSI Strategy", &[1.0, 2.0, 3.0]);
        req.bars.swap(0, 2);
        assert!(req.validate().is_err());

        let mut req = request("RSI Strategy", &[1.0, 2.0]);
        req.bars[1].date = req.bars[0].date;
        assert!(req.validate().is_err());
    }

    #[test]
    fn indicator_series_only_fills_what_the_strategy_uses() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let values = indicator_series(&StrategyKind::Rsi(RsiParams::default()), &closes);
        assert!(values.iter().all(|v| v.fast_ma.is_none() && v.macd_histo.is_none()));
        assert!(values[14].rsi.is_some());

        let values = indicator_series(&StrategyKind::BuyAndHold, &closes);
        assert!(values.iter().all(|v| *v == IndicatorValues::default()));
    }
}
