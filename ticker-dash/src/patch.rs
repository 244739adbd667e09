//! What changed between two renders of the charts.
//!
//! A [`ChartPatch`] holds one [`ColumnPatch`] per trace column that differs. Columns are
//! compared from the front; everything from the first differing index onwards is replaced. A
//! refresh that only moves the live bar therefore patches a single trailing value per column.

use crate::chart::{ChartSet, LineTrace};
use chrono::{DateTime, FixedOffset};

/// Truncate a column at `from`, then append `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPatch<T> {
    pub from: usize,
    pub values: Vec<T>,
}

impl<T: Clone> ColumnPatch<T> {
    pub fn apply(&self, column: &mut Vec<T>) {
        column.truncate(self.from);
        column.extend_from_slice(&self.values);
    }
}

/// Patch turning `prev` into `next`, `None` when they are equal.
pub fn diff_column<T: PartialEq + Clone>(prev: &[T], next: &[T]) -> Option<ColumnPatch<T>> {
    let common = prev
        .iter()
        .zip(next)
        .take_while(|(before, after)| before == after)
        .count();

    if common == prev.len() && common == next.len() {
        return None;
    }

    Some(ColumnPatch {
        from: common,
        values: next[common..].to_vec(),
    })
}

type TimeColumn = ColumnPatch<DateTime<FixedOffset>>;
type PriceColumn = ColumnPatch<f64>;
type LineColumn = ColumnPatch<Option<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricePatch {
    pub x: Option<TimeColumn>,
    pub open: Option<PriceColumn>,
    pub high: Option<PriceColumn>,
    pub low: Option<PriceColumn>,
    pub close: Option<PriceColumn>,
    pub ema: Option<LineColumn>,
    pub boll_high: Option<LineColumn>,
    pub boll_low: Option<LineColumn>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RsiPatch {
    pub x: Option<TimeColumn>,
    pub y: Option<LineColumn>,
}

/// Every column change between two [`ChartSet`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPatch {
    pub price: PricePatch,
    pub rsi: RsiPatch,
}

impl ChartPatch {
    pub fn between(prev: &ChartSet, next: &ChartSet) -> Self {
        let line = |before: &LineTrace, after: &LineTrace| diff_column(&before.y, &after.y);

        Self {
            price: PricePatch {
                x: diff_column(&prev.price.x, &next.price.x),
                open: diff_column(&prev.price.candles.open, &next.price.candles.open),
                high: diff_column(&prev.price.candles.high, &next.price.candles.high),
                low: diff_column(&prev.price.candles.low, &next.price.candles.low),
                close: diff_column(&prev.price.candles.close, &next.price.candles.close),
                ema: line(&prev.price.ema, &next.price.ema),
                boll_high: line(&prev.price.boll_high, &next.price.boll_high),
                boll_low: line(&prev.price.boll_low, &next.price.boll_low),
            },
            rsi: RsiPatch {
                x: diff_column(&prev.rsi.x, &next.rsi.x),
                y: line(&prev.rsi.line, &next.rsi.line),
            },
        }
    }

    /// Number of columns this patch rewrites.
    pub fn changed_columns(&self) -> usize {
        let price = &self.price;
        [
            price.x.is_some(),
            price.open.is_some(),
            price.high.is_some(),
            price.low.is_some(),
            price.close.is_some(),
            price.ema.is_some(),
            price.boll_high.is_some(),
            price.boll_low.is_some(),
            self.rsi.x.is_some(),
            self.rsi.y.is_some(),
        ]
        .into_iter()
        .filter(|changed| *changed)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_columns() == 0
    }

    /// Apply in place; charts keep everything the patch does not mention.
    pub fn apply(&self, charts: &mut ChartSet) {
        fn patch<T: Clone>(patch: &Option<ColumnPatch<T>>, column: &mut Vec<T>) {
            if let Some(patch) = patch {
                patch.apply(column);
            }
        }

        let price = &mut charts.price;
        patch(&self.price.x, &mut price.x);
        patch(&self.price.open, &mut price.candles.open);
        patch(&self.price.high, &mut price.candles.high);
        patch(&self.price.low, &mut price.candles.low);
        patch(&self.price.close, &mut price.candles.close);
        patch(&self.price.ema, &mut price.ema.y);
        patch(&self.price.boll_high, &mut price.boll_high.y);
        patch(&self.price.boll_low, &mut price.boll_low.y);

        patch(&self.rsi.x, &mut charts.rsi.x);
        patch(&self.rsi.y, &mut charts.rsi.line.y);
    }
}
