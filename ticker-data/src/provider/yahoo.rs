use super::MarketDataProvider;
use crate::{bar::Bar, error::DataError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use itertools::izip;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Browser-like agent; the chart endpoint rejects requests without one.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) ticker-dash/0.1";

/// Yahoo chart API client configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Scheme and host of the chart API
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl YahooConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`MarketDataProvider`] backed by the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinance {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooFinance {
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    fn chart_url(&self, ticker: &str, query: &[(&str, String)]) -> Result<Url, DataError> {
        chart_url(&self.base_url, ticker, query)
    }

    async fn fetch_chart(&self, ticker: &str, url: Url) -> Result<ChartResult, DataError> {
        debug!(%url, "requesting chart");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match parse_chart(ticker, &body) {
            Ok(result) => Ok(result),
            // An error envelope is more specific than the bare status code
            Err(DataError::Parse(_)) if !status.is_success() => Err(DataError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            Err(error) => Err(error),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinance {
    async fn exchange_timezone(&self, ticker: &str) -> Result<FixedOffset, DataError> {
        let url = self.chart_url(
            ticker,
            &[
                ("range", "1d".to_string()),
                ("interval", "1h".to_string()),
            ],
        )?;
        let chart = self.fetch_chart(ticker, url).await?;
        chart.meta.offset()
    }

    async fn fetch_daily_history(
        &self,
        ticker: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<Bar>, DataError> {
        check_window(start, end)?;

        let url = self.chart_url(
            ticker,
            &[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("includePrePost", "false".to_string()),
            ],
        )?;
        let chart = self.fetch_chart(ticker, url).await?;
        let bars = chart.into_bars()?;

        if bars.is_empty() {
            return Err(DataError::EmptyResult(ticker.to_string()));
        }
        Ok(bars)
    }

    async fn fetch_latest_bar(&self, ticker: &str) -> Result<Bar, DataError> {
        let url = self.chart_url(
            ticker,
            &[
                ("range", "5d".to_string()),
                ("interval", "1m".to_string()),
                ("includePrePost", "true".to_string()),
            ],
        )?;
        let chart = self.fetch_chart(ticker, url).await?;

        chart.into_latest_bar(ticker)
    }
}

fn check_window(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Result<(), DataError> {
    if start >= end {
        return Err(DataError::InvalidWindow {
            start: start.to_rfc3339(),
            end: end.to_rfc3339(),
        });
    }
    Ok(())
}

fn chart_url(base: &Url, ticker: &str, query: &[(&str, String)]) -> Result<Url, DataError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| DataError::Http(format!("base url cannot hold a path: {base}")))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", ticker]);
    url.query_pairs_mut()
        .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
    Ok(url)
}

// ============================================================================
// Chart API response format
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default)]
    symbol: String,
    gmtoffset: i32,
    #[serde(default)]
    exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

/// Column-oriented OHLCV; `null` marks an interval without trades.
#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl ChartMeta {
    fn offset(&self) -> Result<FixedOffset, DataError> {
        FixedOffset::east_opt(self.gmtoffset).ok_or_else(|| {
            DataError::Parse(format!(
                "gmtoffset {} out of range for {} ({})",
                self.gmtoffset,
                self.symbol,
                self.exchange_timezone_name.as_deref().unwrap_or("unknown zone")
            ))
        })
    }
}

impl ChartResult {
    /// Convert the column arrays into bars, skipping rows with a missing price.
    fn into_bars(self) -> Result<Vec<Bar>, DataError> {
        let offset = self.meta.offset()?;
        // A response without a quote block simply has no rows
        let quote = self.indicators.quote.into_iter().next().unwrap_or_default();

        let bars = izip!(
            self.timestamp.iter(),
            quote.open.iter(),
            quote.high.iter(),
            quote.low.iter(),
            quote.close.iter()
        )
        .enumerate()
        .filter_map(|(index, (ts, open, high, low, close))| {
            let time = DateTime::from_timestamp(*ts, 0)?.with_timezone(&offset);
            let volume = quote.volume.get(index).copied().flatten().unwrap_or(0.0);
            Some(Bar::new(time, (*open)?, (*high)?, (*low)?, (*close)?, volume))
        })
        .collect();

        Ok(bars)
    }

    /// Newest bar with complete prices.
    fn into_latest_bar(self, ticker: &str) -> Result<Bar, DataError> {
        self.into_bars()?
            .pop()
            .ok_or_else(|| DataError::EmptyResult(ticker.to_string()))
    }
}

fn parse_chart(ticker: &str, body: &str) -> Result<ChartResult, DataError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("not found") {
            DataError::SymbolNotFound(ticker.to_string())
        } else {
            DataError::Provider {
                code: error.code,
                description: error.description,
            }
        });
    }

    envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::EmptyResult(ticker.to_string()))
}
