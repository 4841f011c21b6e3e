/// Exponential Moving Average.
///
/// Seeded with the SMA of the first `period` values, then
/// `ema = x * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
#[derive(Debug, Clone)]
pub struct EmaIndicator {
    pub period: usize,
}

impl EmaIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self { period }
    }

    pub fn series(&self, values: &[f64]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if values.len() < self.period {
            return out;
        }

        let k = 2.0 / (self.period as f64 + 1.0);
        let mut ema = values[..self.period].iter().sum::<f64>() / self.period as f64;
        out[self.period - 1] = Some(ema);

        for (i, &x) in values.iter().enumerate().skip(self.period) {
            ema = x * k + ema * (1.0 - k);
            out[i] = Some(ema);
        }
        out
    }

    /// EMA over a series that itself has a warm-up prefix of `None`s.
    /// The output stays `None` until `period` defined inputs have been seen.
    pub fn series_of(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let offset = values.iter().position(Option::is_some).unwrap_or(values.len());
        let defined: Vec<f64> = values[offset..].iter().map(|v| v.unwrap_or(f64::NAN)).collect();

        let mut out = vec![None; offset];
        out.extend(self.series(&defined));
        out
    }
}
