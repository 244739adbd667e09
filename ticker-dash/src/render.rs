//! Rendering abstraction: the controller decides what changed, a [`ChartRenderer`] decides how
//! to show it.

use crate::{chart::ChartSet, patch::ChartPatch};
use std::ops::Range;
use tracing::debug;

/// Smallest number of bars a zoomed-in view shows.
const MIN_SPAN: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// Replace everything; the view resets.
    Rebuild(ChartSet),
    /// Apply column changes; the current view is kept.
    Patch(ChartPatch),
    /// Drop all chart state (ticker changed).
    Clear,
}

pub trait ChartRenderer {
    fn apply(&mut self, update: RenderUpdate);
}

/// Which bars are visible: `span` bars ending `offset` bars before the newest one. A `span` of
/// `None` fits as many bars as the drawing area allows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub span: Option<usize>,
    pub offset: usize,
}

impl Viewport {
    /// Visible index range over `len` bars when at most `fit` bars fit on screen.
    pub fn window(&self, len: usize, fit: usize) -> Range<usize> {
        let count = self.span.unwrap_or(fit).min(fit).min(len);
        let end = len - self.offset.min(len - count);
        end - count..end
    }

    pub fn pan_back(&mut self, bars: usize) {
        self.offset = self.offset.saturating_add(bars);
    }

    pub fn pan_forward(&mut self, bars: usize) {
        self.offset = self.offset.saturating_sub(bars);
    }

    pub fn zoom_in(&mut self, fit: usize) {
        let span = self.span.unwrap_or(fit);
        self.span = Some((span / 2).max(MIN_SPAN));
    }

    pub fn zoom_out(&mut self, fit: usize) {
        self.span = match self.span {
            Some(span) if span.saturating_mul(2) < fit => Some(span * 2),
            _ => None,
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Retained chart state for an immediate-mode UI: holds the last built charts and applies
/// patches to them in place, preserving the user's [`Viewport`] across patches.
#[derive(Debug, Clone, Default)]
pub struct ChartStore {
    charts: Option<ChartSet>,
    viewport: Viewport,
    rebuilds: u64,
    patches: u64,
}

impl ChartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charts(&self) -> Option<&ChartSet> {
        self.charts.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn patches(&self) -> u64 {
        self.patches
    }
}

impl ChartRenderer for ChartStore {
    fn apply(&mut self, update: RenderUpdate) {
        match update {
            RenderUpdate::Rebuild(charts) => {
                debug!(bars = charts.len(), "rebuilding charts");
                self.charts = Some(charts);
                self.viewport.reset();
                self.rebuilds += 1;
            }
            RenderUpdate::Patch(patch) => match self.charts.as_mut() {
                Some(charts) => {
                    debug!(columns = patch.changed_columns(), "patching charts");
                    patch.apply(charts);
                    self.patches += 1;
                }
                None => debug!("ignoring patch without charts"),
            },
            RenderUpdate::Clear => {
                self.charts = None;
                self.viewport.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::test_util::table;

    #[test]
    fn test_viewport_window() {
        struct TestCase {
            viewport: Viewport,
            len: usize,
            fit: usize,
            expected: Range<usize>,
        }

        let tests = vec![
            TestCase {
                // TC0: default follows the newest bars
                viewport: Viewport::default(),
                len: 250,
                fit: 80,
                expected: 170..250,
            },
            TestCase {
                // TC1: fewer bars than fit
                viewport: Viewport::default(),
                len: 30,
                fit: 80,
                expected: 0..30,
            },
            TestCase {
                // TC2: panned back
                viewport: Viewport {
                    span: None,
                    offset: 50,
                },
                len: 250,
                fit: 80,
                expected: 120..200,
            },
            TestCase {
                // TC3: pan clamps at the oldest bar
                viewport: Viewport {
                    span: Some(40),
                    offset: 1_000,
                },
                len: 250,
                fit: 80,
                expected: 0..40,
            },
            TestCase {
                // TC4: empty series
                viewport: Viewport::default(),
                len: 0,
                fit: 80,
                expected: 0..0,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = test.viewport.window(test.len, test.fit);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_viewport_zoom_and_pan() {
        let mut viewport = Viewport::default();

        viewport.zoom_in(80);
        assert_eq!(viewport.span, Some(40));
        viewport.zoom_in(80);
        viewport.zoom_in(80);
        viewport.zoom_in(80);
        assert_eq!(viewport.span, Some(MIN_SPAN));

        viewport.zoom_out(80);
        assert_eq!(viewport.span, Some(20));
        viewport.zoom_out(80);
        viewport.zoom_out(80);
        assert_eq!(viewport.span, None);

        viewport.pan_back(10);
        viewport.pan_forward(4);
        assert_eq!(viewport.offset, 6);
        viewport.pan_forward(100);
        assert_eq!(viewport.offset, 0);
    }

    #[test]
    fn test_patch_keeps_view_and_rebuild_resets_it() {
        let first = ChartSet::from_table("MSFT", &table(&[1.0, 2.0, 3.0]));
        let second = ChartSet::from_table("MSFT", &table(&[1.0, 2.0, 4.0]));
        let mut store = ChartStore::new();

        store.apply(RenderUpdate::Rebuild(first.clone()));
        store.viewport_mut().pan_back(1);

        store.apply(RenderUpdate::Patch(ChartPatch::between(&first, &second)));
        assert_eq!(store.charts(), Some(&second));
        assert_eq!(store.viewport().offset, 1);

        store.apply(RenderUpdate::Rebuild(first.clone()));
        assert_eq!(store.viewport(), Viewport::default());
        assert_eq!((store.rebuilds(), store.patches()), (2, 1));

        store.apply(RenderUpdate::Clear);
        assert!(store.charts().is_none());
    }

    #[test]
    fn test_patch_without_charts_is_ignored() {
        let first = ChartSet::from_table("MSFT", &table(&[1.0]));
        let second = ChartSet::from_table("MSFT", &table(&[2.0]));
        let mut store = ChartStore::new();

        store.apply(RenderUpdate::Patch(ChartPatch::between(&first, &second)));

        assert!(store.charts().is_none());
        assert_eq!(store.patches(), 0);
    }
}
