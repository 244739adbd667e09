//! Chart model: the trace data the dashboard draws, independent of how it is drawn.

use chrono::{DateTime, FixedOffset};
use ticker_data::SeriesTable;

/// Shaded horizontal band on the RSI chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub from: f64,
    pub to: f64,
}

/// Oversold and overbought zones.
pub const RSI_BANDS: [Band; 2] = [Band { from: 0.0, to: 30.0 }, Band { from: 70.0, to: 100.0 }];

/// Fixed RSI y range.
pub const RSI_RANGE: (f64, f64) = (0.0, 100.0);

/// Named y series sharing its chart's x column. `None` points are gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTrace {
    pub name: &'static str,
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleTrace {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

/// Candlesticks with EMA and Bollinger overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub title: String,
    pub x: Vec<DateTime<FixedOffset>>,
    pub candles: CandleTrace,
    pub ema: LineTrace,
    pub boll_high: LineTrace,
    pub boll_low: LineTrace,
}

/// RSI oscillator with fixed 0-100 range and threshold bands.
#[derive(Debug, Clone, PartialEq)]
pub struct RsiChart {
    pub x: Vec<DateTime<FixedOffset>>,
    pub line: LineTrace,
    pub bands: [Band; 2],
    pub y_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSet {
    pub price: PriceChart,
    pub rsi: RsiChart,
}

impl ChartSet {
    pub fn from_table(ticker: &str, table: &SeriesTable) -> Self {
        let rows = table.rows();
        let x: Vec<_> = rows.iter().map(|row| row.bar.time).collect();

        let candles = CandleTrace {
            open: rows.iter().map(|row| row.bar.open).collect(),
            high: rows.iter().map(|row| row.bar.high).collect(),
            low: rows.iter().map(|row| row.bar.low).collect(),
            close: rows.iter().map(|row| row.bar.close).collect(),
        };

        Self {
            price: PriceChart {
                title: format!("{ticker} Price Chart"),
                x: x.clone(),
                candles,
                ema: LineTrace {
                    name: "EMA10",
                    y: rows.iter().map(|row| row.ema).collect(),
                },
                boll_high: LineTrace {
                    name: "Bollinger High",
                    y: rows.iter().map(|row| row.boll_high).collect(),
                },
                boll_low: LineTrace {
                    name: "Bollinger Low",
                    y: rows.iter().map(|row| row.boll_low).collect(),
                },
            },
            rsi: RsiChart {
                x,
                line: LineTrace {
                    name: "RSI",
                    y: rows.iter().map(|row| row.rsi).collect(),
                },
                bands: RSI_BANDS,
                y_range: RSI_RANGE,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.price.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.x.is_empty()
    }
}

impl PriceChart {
    /// Lowest and highest price in `range` across candles and overlays.
    pub fn bounds(&self, range: std::ops::Range<usize>) -> Option<(f64, f64)> {
        let lows = self.candles.low[range.clone()].iter().copied();
        let highs = self.candles.high[range.clone()].iter().copied();
        let overlays = [&self.ema, &self.boll_high, &self.boll_low]
            .into_iter()
            .flat_map(|trace| trace.y[range.clone()].iter().flatten().copied());

        lows.chain(highs)
            .chain(overlays)
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
            })
    }
}


#[cfg(test)]
mod tests {
    use super::{test_util::table, *};

    #[test]
    fn test_from_table_aligns_traces() {
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + i as f64).collect();
        let charts = ChartSet::from_table("MSFT", &table(&closes));

        assert_eq!(charts.len(), 25);
        assert_eq!(charts.price.title, "MSFT Price Chart");
        assert_eq!(charts.price.candles.close, closes);
        assert_eq!(charts.price.ema.y.len(), 25);
        assert_eq!(charts.rsi.x, charts.price.x);
        assert_eq!(charts.rsi.bands, RSI_BANDS);
        assert_eq!(charts.rsi.y_range, (0.0, 100.0));

        // Undefined indicator rows carry through as gaps
        assert!(charts.price.ema.y[8].is_none());
        assert!(charts.price.ema.y[9].is_some());
        assert!(charts.rsi.line.y[12].is_none());
    }

    #[test]
    fn test_price_bounds_cover_candles_and_overlays() {
        let closes: Vec<f64> = (0..25).map(|i| 50.0 + i as f64).collect();
        let charts = ChartSet::from_table("MSFT", &table(&closes));

        let (min, max) = charts.price.bounds(0..25).unwrap();
        assert!(min <= 49.0);
        assert!(max >= 75.0);

        // Before the overlays warm up only candles count
        assert_eq!(charts.price.bounds(0..5), Some((49.0, 55.0)));

        assert_eq!(charts.price.bounds(3..3), None);
    }
}
