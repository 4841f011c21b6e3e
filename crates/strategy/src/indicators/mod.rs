//! Indicator series computed from close prices (oldest first).
//!
//! Every function returns one entry per input close. `None` marks the
//! warm-up steps where the indicator has no value yet.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::EmaIndicator;
pub use macd::MacdIndicator;
pub use rsi::RsiIndicator;
pub use sma::SmaIndicator;

#[cfg(test)]
pub(crate) fn assert_approx(actual: Option<f64>, expected: f64) {
    let v = actual.unwrap_or_else(|| panic!("expected Some({expected}), got None"));
    assert!((v - expected).abs() < 1e-9, "expected {expected}, got {v}");
}
