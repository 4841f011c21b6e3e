use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use common::{Error, Result};

use crate::kind::StrategyKind;

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "rsi"
///
/// [strategy.params]
/// period = 14
/// upper = 70.0
/// lower = 30.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "buy_and_hold", "ma_crossover", "rsi" or "macd".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Parameter overrides; anything left out keeps its default.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl StrategyFileConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read strategy config at '{}': {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl StrategyConfig {
    /// Apply the overrides to the type's defaults and validate the result.
    pub fn build(&self) -> Result<StrategyKind> {
        let base = StrategyKind::from_type_name(&self.strategy_type).ok_or_else(|| {
            Error::Config(format!("Unknown strategy type '{}'", self.strategy_type))
        })?;
        let mut params = Params::new(&self.params);

        let kind = match base {
            StrategyKind::BuyAndHold => StrategyKind::BuyAndHold,
            StrategyKind::MaCrossover(mut p) => {
                p.fast_period = params.usize("fast_period", p.fast_period)?;
                p.slow_period = params.usize("slow_period", p.slow_period)?;
                StrategyKind::MaCrossover(p)
            }
            StrategyKind::Rsi(mut p) => {
                p.period = params.usize("period", p.period)?;
                p.upper = params.f64("upper", p.upper)?;
                p.lower = params.f64("lower", p.lower)?;
                StrategyKind::Rsi(p)
            }
            StrategyKind::Macd(mut p) => {
                p.fast_period = params.usize("fast_period", p.fast_period)?;
                p.slow_period = params.usize("slow_period", p.slow_period)?;
                p.signal_period = params.usize("signal_period", p.signal_period)?;
                StrategyKind::Macd(p)
            }
        };

        params.reject_unused(&self.strategy_type)?;
        kind.validate()?;
        Ok(kind)
    }
}

/// Typed access to the raw `params` table, tracking which keys were read.
struct Params<'a> {
    raw: &'a HashMap<String, toml::Value>,
    used: Vec<&'static str>,
}

impl<'a> Params<'a> {
    fn new(raw: &'a HashMap<String, toml::Value>) -> Self {
        Self { raw, used: Vec::new() }
    }

    fn f64(&mut self, key: &'static str, default: f64) -> Result<f64> {
        self.used.push(key);
        match self.raw.get(key) {
            None => Ok(default),
            Some(toml::Value::Float(v)) => Ok(*v),
            Some(toml::Value::Integer(v)) => Ok(*v as f64),
            Some(other) => Err(wrong_type(key, "a number", other)),
        }
    }

    fn usize(&mut self, key: &'static str, default: usize) -> Result<usize> {
        self.used.push(key);
        match self.raw.get(key) {
            None => Ok(default),
            Some(toml::Value::Integer(v)) => usize::try_from(*v).map_err(|_| {
                Error::Config(format!("Parameter '{key}' must be non-negative, got {v}"))
            }),
            Some(other) => Err(wrong_type(key, "an integer", other)),
        }
    }

    fn reject_unused(&self, strategy_type: &str) -> Result<()> {
        let mut unknown: Vec<&str> = self
            .raw
            .keys()
            .map(String::as_str)
            .filter(|k| !self.used.iter().any(|u| u == k))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        unknown.sort_unstable();
        Err(Error::Config(format!(
            "Unknown parameter(s) for '{strategy_type}': {}",
            unknown.join(", ")
        )))
    }
}

fn wrong_type(key: &str, expected: &str, got: &toml::Value) -> Error {
    Error::Config(format!(
        "Parameter '{key}' must be {expected}, got {}",
        got.type_str()
    ))
}
