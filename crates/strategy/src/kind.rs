use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Parameters for the moving-average crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self { fast_period: 10, slow_period: 30 }
    }
}

/// Parameters for the RSI threshold strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    pub period: usize,
    /// Sell when RSI rises strictly above this value.
    pub upper: f64,
    /// Buy when RSI falls strictly below this value.
    pub lower: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14, upper: 70.0, lower: 30.0 }
    }
}

/// Parameters for the MACD histogram zero-cross strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self { fast_period: 12, slow_period: 26, signal_period: 9 }
    }
}

/// The closed set of strategies, each carrying its own parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "parameters", rename_all = "snake_case")]
pub enum StrategyKind {
    BuyAndHold,
    MaCrossover(MaCrossoverParams),
    Rsi(RsiParams),
    Macd(MacdParams),
}

impl StrategyKind {
    /// All strategy types with default parameters, in display order.
    pub fn defaults() -> [StrategyKind; 4] {
        [
            StrategyKind::BuyAndHold,
            StrategyKind::MaCrossover(MaCrossoverParams::default()),
            StrategyKind::Rsi(RsiParams::default()),
            StrategyKind::Macd(MacdParams::default()),
        ]
    }

    /// Default-parameter variant for a config type identifier.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::defaults()
            .into_iter()
            .find(|k| k.type_name() == type_name)
    }

    /// Identifier used in the strategy TOML file.
    pub fn type_name(&self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "buy_and_hold",
            StrategyKind::MaCrossover(_) => "ma_crossover",
            StrategyKind::Rsi(_) => "rsi",
            StrategyKind::Macd(_) => "macd",
        }
    }

    /// Name shown to users and accepted by the registry.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrategyKind::BuyAndHold => "Buy and Hold",
            StrategyKind::MaCrossover(_) => "Moving Average Crossover",
            StrategyKind::Rsi(_) => "RSI Strategy",
            StrategyKind::Macd(_) => "MACD Strategy",
        }
    }

    /// Reject parameter sets the indicators cannot be built from.
    pub fn validate(&self) -> Result<()> {
        match self {
            StrategyKind::BuyAndHold => Ok(()),
            StrategyKind::MaCrossover(p) => {
                if p.fast_period == 0 {
                    return Err(invalid(self, "fast_period must be >= 1"));
                }
                if p.fast_period >= p.slow_period {
                    return Err(invalid(self, "fast_period must be less than slow_period"));
                }
                Ok(())
            }
            StrategyKind::Rsi(p) => {
                if p.period < 2 {
                    return Err(invalid(self, "period must be >= 2"));
                }
                if !p.lower.is_finite() || !p.upper.is_finite() {
                    return Err(invalid(self, "thresholds must be finite"));
                }
                if !(0.0..=100.0).contains(&p.lower) || !(0.0..=100.0).contains(&p.upper) {
                    return Err(invalid(self, "thresholds must lie within 0..=100"));
                }
                if p.lower >= p.upper {
                    return Err(invalid(self, "lower must be less than upper"));
                }
                Ok(())
            }
            StrategyKind::Macd(p) => {
                if p.fast_period == 0 || p.signal_period == 0 {
                    return Err(invalid(self, "periods must be >= 1"));
                }
                if p.fast_period >= p.slow_period {
                    return Err(invalid(self, "fast_period must be less than slow_period"));
                }
                Ok(())
            }
        }
    }
}

fn invalid(kind: &StrategyKind, msg: &str) -> Error {
    Error::Config(format!("{}: {msg}", kind.display_name()))
}
