//! Canned trading strategies and the per-step signal evaluator.

pub mod config;
pub mod evaluator;
pub mod indicators;
pub mod kind;
pub mod registry;
pub mod runner;

pub use config::{StrategyConfig, StrategyFileConfig};
pub use evaluator::{evaluate, IndicatorValues};
pub use kind::{MacdParams, MaCrossoverParams, RsiParams, StrategyKind};
pub use registry::StrategyRegistry;
pub use runner::{indicator_series, run_backtest, signal_series, BacktestReport, BacktestRequest};
