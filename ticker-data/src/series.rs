//! Merged history + live bar table with recomputed indicator columns.

use crate::{
    bar::{Bar, closes},
    indicator::{IndicatorColumns, IndicatorConfig},
};
use itertools::izip;
use tracing::warn;

/// Concatenate `history` with the `live` bar, preserving order.
///
/// Nothing is de-duplicated or gap-filled: a live bar that overlaps or precedes the last
/// history bar is still appended (and reported by [`live_overlaps`]).
pub fn merge(history: &[Bar], live: Bar) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(history.len() + 1);
    bars.extend_from_slice(history);
    bars.push(live);
    bars
}

/// True when `live` does not start strictly after the last history bar.
pub fn live_overlaps(history: &[Bar], live: &Bar) -> bool {
    history.last().is_some_and(|last| live.time <= last.time)
}

/// One bar plus its derived columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRow {
    pub bar: Bar,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub boll_high: Option<f64>,
    pub boll_low: Option<f64>,
}

/// Ordered rows of bars with indicator columns computed over the whole table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    rows: Vec<SeriesRow>,
}

impl SeriesTable {
    /// Derive every indicator column over `bars`.
    pub fn build(bars: Vec<Bar>, config: &IndicatorConfig) -> Self {
        let IndicatorColumns {
            ema,
            rsi,
            boll_high,
            boll_low,
        } = config.compute(&closes(&bars));

        let rows = izip!(bars, ema, rsi, boll_high, boll_low)
            .map(|(bar, ema, rsi, boll_high, boll_low)| SeriesRow {
                bar,
                ema,
                rsi,
                boll_high,
                boll_low,
            })
            .collect();

        Self { rows }
    }

    /// Merge `history` with `live` and recompute the indicators over the extended series.
    pub fn refresh(history: &[Bar], live: Bar, config: &IndicatorConfig) -> Self {
        if live_overlaps(history, &live) {
            warn!(
                live = %live.time,
                last = ?history.last().map(|bar| bar.time),
                "live bar does not follow history; appending without de-duplication"
            );
        }
        Self::build(merge(history, live), config)
    }

    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&SeriesRow> {
        self.rows.last()
    }

    /// The final `n` rows, oldest first.
    pub fn tail(&self, n: usize) -> &[SeriesRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// True when timestamps never decrease from one row to the next.
    pub fn is_monotonic(&self) -> bool {
        self.rows
            .windows(2)
            .all(|pair| pair[0].bar.time <= pair[1].bar.time)
    }
}
