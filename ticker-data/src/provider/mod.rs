use crate::{bar::Bar, error::DataError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Yahoo Finance chart API client.
pub mod yahoo;

/// Request/response access to a market-data source.
///
/// Implementations perform no retries; a failed call is reported once and the caller decides
/// when to ask again.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// UTC offset the exchange listing `ticker` currently trades in.
    async fn exchange_timezone(&self, ticker: &str) -> Result<FixedOffset, DataError>;

    /// Daily bars in `[start, end)`, regular session only, oldest first.
    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<Bar>, DataError>;

    /// The most recent one-minute bar, pre and post market included.
    async fn fetch_latest_bar(&self, ticker: &str) -> Result<Bar, DataError>;
}
