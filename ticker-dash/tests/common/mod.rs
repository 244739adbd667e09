#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use ticker_dash::{RefreshController, render::ChartStore};
use ticker_data::{
    Bar, DataError,
    clock::ManualClock,
    history::DEFAULT_HISTORY_TTL,
    provider::MarketDataProvider,
};

pub const HISTORY_DAYS: usize = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub timezone: usize,
    pub history: usize,
    pub live: usize,
}

/// In-memory provider returning a fixed daily history and a settable live bar.
pub struct FakeProvider {
    history: Vec<Bar>,
    live: Mutex<Bar>,
    calls: Mutex<Calls>,
    requested: Mutex<Vec<String>>,
    history_error: Mutex<Option<DataError>>,
    live_error: Mutex<Option<DataError>>,
}

pub fn exchange_tz() -> FixedOffset {
    FixedOffset::west_opt(4 * 3600).unwrap()
}

/// Daily bars at 09:30 exchange time from 2024-01-02, closes cycling 100..106.
pub fn daily_history() -> Vec<Bar> {
    let start = exchange_tz().with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
    (0..HISTORY_DAYS)
        .map(|i| {
            let close = 100.0 + (i % 7) as f64;
            Bar::new(
                start + TimeDelta::days(i as i64),
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                1_000.0,
            )
        })
        .collect()
}

/// One minute after the last history bar.
pub fn live_bar(history: &[Bar], close: f64) -> Bar {
    let last = history.last().unwrap();
    Bar::new(
        last.time + TimeDelta::minutes(1),
        close,
        close + 0.25,
        close - 0.25,
        close,
        10.0,
    )
}

impl FakeProvider {
    pub fn new() -> Self {
        let history = daily_history();
        let live = live_bar(&history, 100.0);
        Self {
            history,
            live: Mutex::new(live),
            calls: Mutex::new(Calls::default()),
            requested: Mutex::new(Vec::new()),
            history_error: Mutex::new(None),
            live_error: Mutex::new(None),
        }
    }

    pub fn history(&self) -> &[Bar] {
        &self.history
    }

    pub fn set_live_close(&self, close: f64) {
        *self.live.lock() = live_bar(&self.history, close);
    }

    pub fn fail_history(&self, error: Option<DataError>) {
        *self.history_error.lock() = error;
    }

    pub fn fail_live(&self, error: Option<DataError>) {
        *self.live_error.lock() = error;
    }

    pub fn calls(&self) -> Calls {
        *self.calls.lock()
    }

    /// Tickers passed to history requests, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    async fn exchange_timezone(&self, _: &str) -> Result<FixedOffset, DataError> {
        self.calls.lock().timezone += 1;
        Ok(exchange_tz())
    }

    async fn fetch_daily_history(
        &self,
        ticker: &str,
        _: DateTime<FixedOffset>,
        _: DateTime<FixedOffset>,
    ) -> Result<Vec<Bar>, DataError> {
        self.calls.lock().history += 1;
        self.requested.lock().push(ticker.to_string());
        match self.history_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(self.history.clone()),
        }
    }

    async fn fetch_latest_bar(&self, _: &str) -> Result<Bar, DataError> {
        self.calls.lock().live += 1;
        match self.live_error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(*self.live.lock()),
        }
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap()
}

pub struct Harness {
    pub provider: Arc<FakeProvider>,
    pub clock: ManualClock,
    pub controller: RefreshController<ChartStore>,
}

pub fn harness() -> Harness {
    let provider = Arc::new(FakeProvider::new());
    let clock = ManualClock::new(start_time());
    let controller = RefreshController::new(
        provider.clone(),
        Arc::new(clock.clone()),
        DEFAULT_HISTORY_TTL,
        ChartStore::new(),
    );
    Harness {
        provider,
        clock,
        controller,
    }
}
