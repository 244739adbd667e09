use chrono::{DateTime, FixedOffset, NaiveDate};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// A single OHLCV record for one interval, stamped in the exchange's local offset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Constructor)]
pub struct Bar {
    pub time: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Exchange-local calendar date of the bar.
    pub fn date(&self) -> NaiveDate {
        self.time.date_naive()
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Extract the close column of a bar sequence.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_date_uses_exchange_offset() {
        // 2024-01-02 23:30 in UTC-4 is already the 3rd in UTC
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let time = DateTime::parse_from_rfc3339("2024-01-03T03:30:00Z")
            .unwrap()
            .with_timezone(&offset);
        let bar = Bar::new(time, 1.0, 2.0, 0.5, 1.5, 10.0);

        assert_eq!(bar.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(bar.is_bullish());
    }
}
