/// Relative strength index with Wilder smoothing (`alpha = 1 / window`).
///
/// Average gain and loss are exponentially smoothed from the first row, where the missing
/// previous close counts as no change. A value is reported once `window` rows have been seen;
/// a zero average loss reads as 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    window: usize,
    alpha: f64,
    prev_close: Option<f64>,
    avg_gain: f64,
    avg_loss: f64,
    count: usize,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be > 0");
        Self {
            window,
            alpha: 1.0 / window as f64,
            prev_close: None,
            avg_gain: 0.0,
            avg_loss: 0.0,
            count: 0,
        }
    }

    pub fn update(&mut self, close: f64) -> Option<f64> {
        let change = self.prev_close.map_or(0.0, |prev| close - prev);
        self.prev_close = Some(close);

        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if self.count == 0 {
            self.avg_gain = gain;
            self.avg_loss = loss;
        } else {
            self.avg_gain += self.alpha * (gain - self.avg_gain);
            self.avg_loss += self.alpha * (loss - self.avg_loss);
        }
        self.count += 1;

        if self.count < self.window {
            return None;
        }

        if self.avg_loss == 0.0 {
            Some(100.0)
        } else {
            let relative_strength = self.avg_gain / self.avg_loss;
            Some(100.0 - 100.0 / (1.0 + relative_strength))
        }
    }
}

/// RSI column for `closes`; the first `window - 1` rows are `None`.
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut rsi = Rsi::new(window);
    closes.iter().map(|close| rsi.update(*close)).collect()
}
