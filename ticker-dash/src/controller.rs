//! Drives the history → live → merge → indicators → chart pipeline once per tick.

use crate::{
    chart::ChartSet,
    patch::ChartPatch,
    render::{ChartRenderer, RenderUpdate},
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use derive_more::Display;
use std::sync::Arc;
use ticker_data::{
    Bar, DataError, SeriesTable,
    clock::Clock,
    history::HistoryLoader,
    indicator::IndicatorConfig,
    live::LiveSampler,
    provider::MarketDataProvider,
};
use tracing::{debug, error, info, warn};

/// Number of merged rows logged at debug level after each tick.
const LOGGED_TAIL_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    #[display("IDLE")]
    Idle,
    #[display("LOADING_HISTORY")]
    LoadingHistory,
    #[display("READY")]
    Ready,
    #[display("REFRESHING")]
    Refreshing,
}

/// What a call to [`RefreshController::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No ticker submitted yet.
    Idle,
    /// Charts were built from scratch.
    Rebuilt,
    /// Charts were patched in place.
    Patched,
    /// Nothing changed since the previous tick.
    Unchanged,
    /// The tick aborted; see [`RefreshController::last_error`].
    Failed,
}

/// Owns the per-ticker state and pushes every chart change through a [`ChartRenderer`].
pub struct RefreshController<R> {
    provider: Arc<dyn MarketDataProvider>,
    loader: HistoryLoader,
    sampler: LiveSampler,
    clock: Arc<dyn Clock>,
    indicators: IndicatorConfig,
    renderer: R,

    ticker: Option<String>,
    tz: Option<FixedOffset>,
    phase: Phase,
    history: Option<Arc<Vec<Bar>>>,
    table: SeriesTable,
    charts: Option<ChartSet>,
    last_tick_date: Option<NaiveDate>,
    last_error: Option<DataError>,
}

impl<R> RefreshController<R>
where
    R: ChartRenderer,
{
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        clock: Arc<dyn Clock>,
        history_ttl: TimeDelta,
        renderer: R,
    ) -> Self {
        Self {
            loader: HistoryLoader::new(Arc::clone(&provider), history_ttl),
            sampler: LiveSampler::new(Arc::clone(&provider)),
            provider,
            clock,
            indicators: IndicatorConfig::default(),
            renderer,
            ticker: None,
            tz: None,
            phase: Phase::Idle,
            history: None,
            table: SeriesTable::default(),
            charts: None,
            last_tick_date: None,
            last_error: None,
        }
    }

    /// Switch to `ticker`, discarding all state for the previous one. The next tick loads
    /// history. Resubmitting the current ticker keeps everything, including the view. A blank
    /// ticker returns the controller to [`Phase::Idle`].
    pub fn submit_ticker(&mut self, ticker: &str) {
        let ticker = ticker.trim().to_uppercase();

        if self.ticker.as_deref() == Some(ticker.as_str()) {
            debug!(%ticker, "ticker unchanged, keeping state");
            return;
        }

        self.tz = None;
        self.history = None;
        self.table = SeriesTable::default();
        self.charts = None;
        self.last_error = None;
        self.renderer.apply(RenderUpdate::Clear);

        if ticker.is_empty() {
            info!("ticker cleared");
            self.ticker = None;
            self.phase = Phase::Idle;
        } else {
            info!(%ticker, "ticker submitted");
            self.ticker = Some(ticker);
            self.phase = Phase::LoadingHistory;
        }
    }

    /// Run the pipeline once. Errors abort this tick only and are kept in
    /// [`last_error`](Self::last_error) until a later tick succeeds.
    pub async fn tick(&mut self) -> TickOutcome {
        let Some(ticker) = self.ticker.clone() else {
            return TickOutcome::Idle;
        };

        let now = self.clock.now();
        self.roll_over(now.date_naive());

        match self.run(&ticker, now).await {
            Ok(outcome) => {
                self.last_error = None;
                outcome
            }
            Err(err) => {
                if err.is_symbol_error() {
                    warn!(%ticker, phase = %self.phase, %err, "tick failed");
                } else {
                    error!(%ticker, phase = %self.phase, %err, "tick failed");
                }
                self.last_error = Some(err);
                TickOutcome::Failed
            }
        }
    }

    /// A new UTC calendar date invalidates history and forces a rebuild.
    fn roll_over(&mut self, today: NaiveDate) {
        let previous = self.last_tick_date.replace(today);
        if let Some(previous) = previous.filter(|previous| *previous != today) {
            info!(%previous, %today, "day rollover, reloading history");
            self.tz = None;
            self.history = None;
            self.charts = None;
            self.phase = Phase::LoadingHistory;
        }
    }

    async fn run(&mut self, ticker: &str, now: DateTime<Utc>) -> Result<TickOutcome, DataError> {
        let had_history = self.history.is_some();
        self.phase = if had_history {
            Phase::Refreshing
        } else {
            Phase::LoadingHistory
        };

        let history = match self.load_history(ticker, now).await {
            Ok(history) => history,
            Err(err) => {
                if had_history {
                    self.phase = Phase::Ready;
                }
                return Err(err);
            }
        };
        self.history = Some(Arc::clone(&history));
        self.phase = Phase::Refreshing;

        let live = self.sampler.sample(ticker).await;
        self.phase = Phase::Ready;
        let live = live?;

        self.table = SeriesTable::refresh(&history, live, &self.indicators);
        for row in self.table.tail(LOGGED_TAIL_ROWS) {
            debug!(
                time = %row.bar.time,
                open = row.bar.open,
                high = row.bar.high,
                low = row.bar.low,
                close = row.bar.close,
                volume = row.bar.volume,
                ema = ?row.ema,
                rsi = ?row.rsi,
                boll_high = ?row.boll_high,
                boll_low = ?row.boll_low,
                "merged row"
            );
        }

        let charts = ChartSet::from_table(ticker, &self.table);
        let outcome = match self.charts.as_ref() {
            None => {
                self.renderer.apply(RenderUpdate::Rebuild(charts.clone()));
                TickOutcome::Rebuilt
            }
            Some(previous) => {
                let patch = ChartPatch::between(previous, &charts);
                if patch.is_empty() {
                    TickOutcome::Unchanged
                } else {
                    self.renderer.apply(RenderUpdate::Patch(patch));
                    TickOutcome::Patched
                }
            }
        };
        self.charts = Some(charts);

        Ok(outcome)
    }

    async fn load_history(
        &mut self,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> Result<Arc<Vec<Bar>>, DataError> {
        let tz = match self.tz {
            Some(tz) => tz,
            None => {
                let tz = self.provider.exchange_timezone(ticker).await?;
                debug!(ticker, %tz, "discovered exchange timezone");
                self.tz = Some(tz);
                tz
            }
        };
        self.loader.load(ticker, tz, now).await
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn table(&self) -> &SeriesTable {
        &self.table
    }

    /// Close of the newest merged row.
    pub fn latest_price(&self) -> Option<f64> {
        self.table.last().map(|row| row.bar.close)
    }

    pub fn last_error(&self) -> Option<&DataError> {
        self.last_error.as_ref()
    }

    /// Today's date according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
