use super::ema::EmaIndicator;

/// MACD (Moving Average Convergence/Divergence) histogram.
///
/// MACD line = EMA(fast) - EMA(slow), signal line = EMA(signal) of the MACD
/// line, histogram = MACD line - signal line. The first histogram value lands
/// at index `slow + signal - 2`.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self { fast, slow, signal }
    }

    /// MACD line, one entry per close.
    pub fn macd_line(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let fast = EmaIndicator::new(self.fast).series(closes);
        let slow = EmaIndicator::new(self.slow).series(closes);
        fast.iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect()
    }

    /// Histogram series, one entry per close.
    pub fn histogram(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let macd = self.macd_line(closes);
        let signal = EmaIndicator::new(self.signal).series_of(&macd);
        macd.iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect()
    }
}
