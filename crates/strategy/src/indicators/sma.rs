/// Simple Moving Average of close prices.
///
/// First value lands at index `period - 1`.
#[derive(Debug, Clone)]
pub struct SmaIndicator {
    pub period: usize,
}

impl SmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self { period }
    }

    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; closes.len()];
        if closes.len() < self.period {
            return out;
        }

        for i in self.period - 1..closes.len() {
            out[i] = Some(window_mean(&closes[i + 1 - self.period..=i]));
        }
        out
    }
}

/// Mean of one window, summed fresh and anchored on its newest value.
/// A flat window averages to exactly its close, so equal windows of any
/// length compare equal.
fn window_mean(window: &[f64]) -> f64 {
    let anchor = window[window.len() - 1];
    let offset: f64 = window.iter().map(|x| x - anchor).sum();
    anchor + offset / window.len() as f64
}
