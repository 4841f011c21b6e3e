use serde::{Deserialize, Serialize};

use common::Signal;

use crate::kind::StrategyKind;

/// Indicator readings for a single time step.
///
/// A field is `None` when the strategy does not use that indicator or when
/// the indicator is still warming up at this step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorValues {
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_histo: Option<f64>,
}

/// Classify one time step.
///
/// `current` holds the readings at step t and `previous` those at t-1
/// (`None` at the first step). Crossover rules need both; a missing reading
/// never fires a signal.
pub fn evaluate(
    strategy: &StrategyKind,
    current: &IndicatorValues,
    previous: Option<&IndicatorValues>,
) -> Signal {
    match strategy {
        StrategyKind::BuyAndHold => Signal::Hold,
        StrategyKind::MaCrossover(_) => ma_crossover(current, previous),
        StrategyKind::Rsi(params) => match current.rsi {
            Some(rsi) if rsi < params.lower => Signal::Buy,
            Some(rsi) if rsi > params.upper => Signal::Sell,
            _ => Signal::Hold,
        },
        StrategyKind::Macd(_) => macd_zero_cross(current, previous),
    }
}

fn ma_crossover(current: &IndicatorValues, previous: Option<&IndicatorValues>) -> Signal {
    let (Some(fast), Some(slow)) = (current.fast_ma, current.slow_ma) else {
        return Signal::Hold;
    };
    let Some((prev_fast, prev_slow)) = previous.and_then(|p| Some((p.fast_ma?, p.slow_ma?))) else {
        return Signal::Hold;
    };

    if fast > slow && prev_fast <= prev_slow {
        Signal::Buy
    } else if fast < slow && prev_fast >= prev_slow {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn macd_zero_cross(current: &IndicatorValues, previous: Option<&IndicatorValues>) -> Signal {
    let (Some(histo), Some(prev)) = (current.macd_histo, previous.and_then(|p| p.macd_histo)) else {
        return Signal::Hold;
    };

    if histo > 0.0 && prev <= 0.0 {
        Signal::Buy
    } else if histo < 0.0 && prev >= 0.0 {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
