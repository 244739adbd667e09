#![forbid(unsafe_code)]
#![warn(unused, clippy::cloned_instead_of_copied)]

//! # Ticker-Data
//! Market data plumbing for a single-ticker dashboard:
//! * **History**: a year of daily bars per ticker, served from an explicit TTL cache keyed by
//!   ticker, exchange offset and window end date.
//! * **Live**: the latest one-minute bar, pre and post market included.
//! * **Series**: history and live bar merged into one ordered table with EMA, RSI and Bollinger
//!   columns recomputed over the whole series.
//!
//! Data is retrieved through the [`MarketDataProvider`](provider::MarketDataProvider) trait,
//! implemented for the Yahoo Finance chart API by [`YahooFinance`](provider::yahoo::YahooFinance).
//! Time is read through an injected [`Clock`](clock::Clock).

/// OHLCV [`Bar`](bar::Bar) definition.
pub mod bar;

/// Keyed time-to-live cache.
pub mod cache;

/// Injectable wall clock.
pub mod clock;

/// All [`Error`](std::error::Error)s generated in Ticker-Data.
pub mod error;

/// Cached daily history loading.
pub mod history;

/// Technical indicators over close prices.
pub mod indicator;

/// Latest intraday bar sampling.
pub mod live;

/// Market-data provider abstraction and implementations.
pub mod provider;

/// History + live bar merging and indicator tables.
pub mod series;

pub use bar::Bar;
pub use error::DataError;
pub use series::{SeriesRow, SeriesTable};
