//! Technical indicators derived from the close column.
//!
//! Every indicator is a streaming window: rows before the window has filled are `None`, never a
//! partially warmed number.

mod bollinger;
mod ema;
mod rsi;

pub use bollinger::{Bands, Bollinger, bollinger};
pub use ema::{Ema, ema};
pub use rsi::{Rsi, rsi};

/// Indicator windows used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub ema_window: usize,
    pub rsi_window: usize,
    pub bollinger_window: usize,
    pub bollinger_deviations: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_window: 10,
            rsi_window: 14,
            bollinger_window: 20,
            bollinger_deviations: 2.0,
        }
    }
}

/// Derived columns, row-aligned with the closes they were computed from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorColumns {
    pub ema: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub boll_high: Vec<Option<f64>>,
    pub boll_low: Vec<Option<f64>>,
}

impl IndicatorConfig {
    /// Recompute every column over the full close series.
    pub fn compute(&self, closes: &[f64]) -> IndicatorColumns {
        let bands = bollinger(closes, self.bollinger_window, self.bollinger_deviations);

        IndicatorColumns {
            ema: ema(closes, self.ema_window),
            rsi: rsi(closes, self.rsi_window),
            boll_high: bands.iter().map(|row| row.map(|b| b.high)).collect(),
            boll_low: bands.iter().map(|row| row.map(|b| b.low)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_row_aligned_with_warmup() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let columns = IndicatorConfig::default().compute(&closes);

        struct TestCase {
            name: &'static str,
            column: Vec<Option<f64>>,
            first_defined: usize,
        }

        let tests = vec![
            TestCase {
                // TC0: EMA10
                name: "ema",
                column: columns.ema,
                first_defined: 9,
            },
            TestCase {
                // TC1: RSI14
                name: "rsi",
                column: columns.rsi,
                first_defined: 13,
            },
            TestCase {
                // TC2: Bollinger high
                name: "boll_high",
                column: columns.boll_high,
                first_defined: 19,
            },
            TestCase {
                // TC3: Bollinger low
                name: "boll_low",
                column: columns.boll_low,
                first_defined: 19,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.column.len(), 30, "TC{} {} length", index, test.name);
            assert!(
                test.column[..test.first_defined].iter().all(Option::is_none),
                "TC{} {} defined during warmup",
                index,
                test.name
            );
            assert!(
                test.column[test.first_defined..].iter().all(Option::is_some),
                "TC{} {} undefined after warmup",
                index,
                test.name
            );
        }
    }
}
