//! Year-long daily history, fetched once per window and served from a TTL cache.

use crate::{bar::Bar, cache::TtlCache, error::DataError, provider::MarketDataProvider};
use chrono::{DateTime, FixedOffset, Months, NaiveDate, TimeDelta, Utc};
use derive_more::Display;
use std::sync::Arc;
use tracing::{debug, info};

/// Default cache lifetime for a loaded history window.
pub const DEFAULT_HISTORY_TTL: TimeDelta = TimeDelta::minutes(30);

/// History stops this long before "now" so the still-forming session is left to the live bar.
pub const HISTORY_END_LAG: TimeDelta = TimeDelta::hours(8);

/// Length of the history window in months.
pub const HISTORY_SPAN_MONTHS: u32 = 12;

/// Identifies one fetched history window. The end date is part of the key so a calendar day
/// rollover is a cache miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{ticker}@{utc_offset_secs}s/{window_end}")]
pub struct HistoryKey {
    pub ticker: String,
    pub utc_offset_secs: i32,
    pub window_end: NaiveDate,
}

/// `[start, end)` bounds of a history request in exchange-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl HistoryWindow {
    /// One year back from `now` to eight hours before it, expressed in `tz`.
    pub fn ending_at(now: DateTime<FixedOffset>) -> Self {
        let start = now
            .checked_sub_months(Months::new(HISTORY_SPAN_MONTHS))
            .unwrap_or(now - TimeDelta::days(365));
        Self {
            start,
            end: now - HISTORY_END_LAG,
        }
    }
}

/// Loads daily history through a [`MarketDataProvider`], caching each window.
pub struct HistoryLoader {
    provider: Arc<dyn MarketDataProvider>,
    cache: TtlCache<HistoryKey, Arc<Vec<Bar>>>,
}

impl HistoryLoader {
    pub fn new(provider: Arc<dyn MarketDataProvider>, ttl: TimeDelta) -> Self {
        Self {
            provider,
            cache: TtlCache::new(ttl),
        }
    }

    /// Daily bars for `ticker` over the window ending at `now`, from cache when still fresh.
    pub async fn load(
        &self,
        ticker: &str,
        tz: FixedOffset,
        now: DateTime<Utc>,
    ) -> Result<Arc<Vec<Bar>>, DataError> {
        let window = HistoryWindow::ending_at(now.with_timezone(&tz));
        let key = HistoryKey {
            ticker: ticker.to_string(),
            utc_offset_secs: tz.local_minus_utc(),
            window_end: window.end.date_naive(),
        };

        if let Some(bars) = self.cache.get(&key, now) {
            debug!(%key, bars = bars.len(), "history cache hit");
            return Ok(bars);
        }

        debug!(%key, start = %window.start, end = %window.end, "history cache miss");
        let bars = Arc::new(
            self.provider
                .fetch_daily_history(ticker, window.start, window.end)
                .await?,
        );

        let purged = self.cache.purge_expired(now);
        self.cache.insert(key.clone(), Arc::clone(&bars), now);
        info!(
            %key,
            bars = bars.len(),
            purged,
            cached = self.cache.len(),
            ttl_secs = self.cache.ttl().num_seconds(),
            "loaded history"
        );

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::test_util::daily_bars;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CountingProvider {
        windows: Mutex<Vec<(String, HistoryWindow)>>,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn exchange_timezone(&self, _: &str) -> Result<FixedOffset, DataError> {
            Ok(FixedOffset::west_opt(4 * 3600).unwrap())
        }

        async fn fetch_daily_history(
            &self,
            ticker: &str,
            start: DateTime<FixedOffset>,
            end: DateTime<FixedOffset>,
        ) -> Result<Vec<Bar>, DataError> {
            self.windows
                .lock()
                .push((ticker.to_string(), HistoryWindow { start, end }));
            Ok(daily_bars(&[100.0, 101.0, 102.0]))
        }

        async fn fetch_latest_bar(&self, ticker: &str) -> Result<Bar, DataError> {
            Err(DataError::EmptyResult(ticker.to_string()))
        }
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn loader() -> (Arc<CountingProvider>, HistoryLoader) {
        let provider = Arc::new(CountingProvider::default());
        let loader = HistoryLoader::new(provider.clone(), DEFAULT_HISTORY_TTL);
        (provider, loader)
    }

    #[test]
    fn test_window_spans_one_year_ending_eight_hours_ago() {
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let now = at("2024-06-03T18:00:00Z").with_timezone(&tz);
        let window = HistoryWindow::ending_at(now);

        assert_eq!(window.start.to_rfc3339(), "2023-06-03T14:00:00-04:00");
        assert_eq!(window.end.to_rfc3339(), "2024-06-03T06:00:00-04:00");
    }

    #[tokio::test]
    async fn test_reuses_cached_window_within_ttl() {
        let (provider, loader) = loader();
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let now = at("2024-06-03T18:00:00Z");

        let first = loader.load("MSFT", tz, now).await.unwrap();
        let second = loader
            .load("MSFT", tz, now + TimeDelta::minutes(29))
            .await
            .unwrap();

        assert_eq!(provider.windows.lock().len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_refetches_after_expiry() {
        let (provider, loader) = loader();
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let now = at("2024-06-03T18:00:00Z");

        loader.load("MSFT", tz, now).await.unwrap();
        loader
            .load("MSFT", tz, now + TimeDelta::minutes(31))
            .await
            .unwrap();

        assert_eq!(provider.windows.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_tickers_cached_separately() {
        let (provider, loader) = loader();
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let now = at("2024-06-03T18:00:00Z");

        loader.load("MSFT", tz, now).await.unwrap();
        loader.load("AAPL", tz, now).await.unwrap();
        loader.load("MSFT", tz, now).await.unwrap();

        let tickers: Vec<_> = provider
            .windows
            .lock()
            .iter()
            .map(|(ticker, _)| ticker.clone())
            .collect();
        assert_eq!(tickers, vec!["MSFT".to_string(), "AAPL".to_string()]);
    }

    #[tokio::test]
    async fn test_day_rollover_misses_cache() {
        // Window ends 23:50 on the 3rd; twenty minutes later it ends on the 4th
        let (provider, loader) = loader();
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = at("2024-06-04T07:50:00Z");

        loader.load("MSFT", tz, now).await.unwrap();
        loader
            .load("MSFT", tz, now + TimeDelta::minutes(20))
            .await
            .unwrap();

        assert_eq!(provider.windows.lock().len(), 2);
    }
}
