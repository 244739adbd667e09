use std::collections::VecDeque;

/// One row of Bollinger band output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub high: f64,
    pub middle: f64,
    pub low: f64,
}

/// Bollinger bands: simple moving average ± `deviations` population standard deviations over
/// the last `window` closes.
#[derive(Debug, Clone)]
pub struct Bollinger {
    window: usize,
    deviations: f64,
    closes: VecDeque<f64>,
}

impl Bollinger {
    pub fn new(window: usize, deviations: f64) -> Self {
        assert!(window > 0, "window must be > 0");
        Self {
            window,
            deviations,
            closes: VecDeque::with_capacity(window),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<Bands> {
        if self.closes.len() == self.window {
            self.closes.pop_front();
        }
        self.closes.push_back(close);

        if self.closes.len() < self.window {
            return None;
        }

        let n = self.window as f64;
        let middle = self.closes.iter().sum::<f64>() / n;
        let variance = self
            .closes
            .iter()
            .map(|close| (close - middle).powi(2))
            .sum::<f64>()
            / n;
        let spread = self.deviations * variance.sqrt();

        Some(Bands {
            high: middle + spread,
            middle,
            low: middle - spread,
        })
    }
}

/// Band rows for `closes`; the first `window - 1` rows are `None`.
pub fn bollinger(closes: &[f64], window: usize, deviations: f64) -> Vec<Option<Bands>> {
    let mut bands = Bollinger::new(window, deviations);
    closes.iter().map(|close| bands.update(*close)).collect()
}
