/// Exponential moving average over closes, `alpha = 2 / (window + 1)`.
///
/// Seeded with the first observation and smoothed recursively from there (pandas
/// `ewm(span=window, adjust=False)`), but only reported once `window` values have been seen.
#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    alpha: f64,
    value: f64,
    count: usize,
}

impl Ema {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be > 0");
        Self {
            window,
            alpha: 2.0 / (window as f64 + 1.0),
            value: 0.0,
            count: 0,
        }
    }

    /// Feed one close, returning the average once warm.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        self.value = if self.count == 0 {
            close
        } else {
            self.value + self.alpha * (close - self.value)
        };
        self.count += 1;
        (self.count >= self.window).then_some(self.value)
    }
}

/// EMA column for `closes`; the first `window - 1` rows are `None`.
pub fn ema(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut ema = Ema::new(window);
    closes.iter().map(|close| ema.update(*close)).collect()
}
