use crate::refresh::RefreshSpeed;
use chrono::TimeDelta;
use std::{path::PathBuf, time::Duration};
use ticker_data::provider::yahoo::{DEFAULT_BASE_URL, YahooConfig};
use tracing::warn;

/// Shortest and longest history cache lifetimes accepted from the environment.
const MIN_HISTORY_TTL_SECS: i64 = 30 * 60;
const MAX_HISTORY_TTL_SECS: i64 = 60 * 60;

/// Largest tail-of-table size accepted from the environment.
const MAX_TABLE_ROWS: usize = 50;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Ticker loaded on startup
    pub ticker: String,
    /// Initial refresh cadence
    pub speed: RefreshSpeed,
    /// Chart API scheme and host
    pub base_url: String,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
    /// History cache lifetime
    pub history_ttl: TimeDelta,
    /// Rows shown in the tail-of-table panel
    pub table_rows: usize,
    /// File receiving log output while the terminal is in the alternate screen
    pub log_path: PathBuf,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            ticker: "MSFT".to_string(),
            speed: RefreshSpeed::Never,
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(10),
            history_ttl: TimeDelta::seconds(MIN_HISTORY_TTL_SECS),
            table_rows: 2,
            log_path: PathBuf::from("ticker-dash.log"),
        }
    }
}

impl DashConfig {
    /// Read configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unparsable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(ticker) = lookup("TICKER").filter(|t| !t.trim().is_empty()) {
            config = config.with_ticker(ticker);
        }
        if let Some(speed) = lookup("REFRESH_SPEED") {
            match speed.parse() {
                Ok(speed) => config.speed = speed,
                Err(error) => warn!(%error, "ignoring REFRESH_SPEED"),
            }
        }
        if let Some(url) = lookup("YAHOO_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = parse_number::<u64>(&lookup, "HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_number::<i64>(&lookup, "HISTORY_TTL_SECS") {
            config = config.with_history_ttl(TimeDelta::seconds(secs));
        }
        if let Some(rows) = parse_number::<usize>(&lookup, "TABLE_ROWS") {
            config = config.with_table_rows(rows);
        }
        if let Some(path) = lookup("TICKER_DASH_LOG") {
            config.log_path = PathBuf::from(path);
        }

        config
    }

    /// Set the startup ticker, normalised to upper case
    pub fn with_ticker(mut self, ticker: impl AsRef<str>) -> Self {
        self.ticker = ticker.as_ref().trim().to_uppercase();
        self
    }

    /// Set the refresh cadence
    pub fn with_speed(mut self, speed: RefreshSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Set the history cache lifetime, clamped to 30-60 minutes
    pub fn with_history_ttl(mut self, ttl: TimeDelta) -> Self {
        let secs = ttl
            .num_seconds()
            .clamp(MIN_HISTORY_TTL_SECS, MAX_HISTORY_TTL_SECS);
        self.history_ttl = TimeDelta::seconds(secs);
        self
    }

    /// Set the tail-of-table size, clamped to 1-50 rows
    pub fn with_table_rows(mut self, rows: usize) -> Self {
        self.table_rows = rows.clamp(1, MAX_TABLE_ROWS);
        self
    }

    pub fn yahoo(&self) -> YahooConfig {
        YahooConfig::new(self.base_url.clone()).with_timeout(self.http_timeout)
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DashConfig::from_lookup(lookup(&[]));

        assert_eq!(config.ticker, "MSFT");
        assert_eq!(config.speed, RefreshSpeed::Never);
        assert_eq!(config.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.history_ttl, TimeDelta::minutes(30));
        assert_eq!(config.table_rows, 2);
    }

    #[test]
    fn test_env_overrides() {
        let config = DashConfig::from_lookup(lookup(&[
            ("TICKER", " aapl "),
            ("REFRESH_SPEED", "fast"),
            ("HTTP_TIMEOUT_SECS", "3"),
            ("HISTORY_TTL_SECS", "2700"),
            ("TABLE_ROWS", "5"),
            ("TICKER_DASH_LOG", "/tmp/dash.log"),
        ]));

        assert_eq!(config.ticker, "AAPL");
        assert_eq!(config.speed, RefreshSpeed::Fast);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.history_ttl, TimeDelta::minutes(45));
        assert_eq!(config.table_rows, 5);
        assert_eq!(config.log_path, PathBuf::from("/tmp/dash.log"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = DashConfig::from_lookup(lookup(&[
            ("REFRESH_SPEED", "turbo"),
            ("TABLE_ROWS", "many"),
            ("TICKER", "  "),
        ]));

        assert_eq!(config.speed, RefreshSpeed::Never);
        assert_eq!(config.table_rows, 2);
        assert_eq!(config.ticker, "MSFT");
    }

    #[test]
    fn test_history_ttl_clamped() {
        struct TestCase {
            input: TimeDelta,
            expected: TimeDelta,
        }

        let tests = vec![
            TestCase {
                // TC0: below minimum
                input: TimeDelta::minutes(5),
                expected: TimeDelta::minutes(30),
            },
            TestCase {
                // TC1: within range
                input: TimeDelta::minutes(40),
                expected: TimeDelta::minutes(40),
            },
            TestCase {
                // TC2: above maximum
                input: TimeDelta::hours(3),
                expected: TimeDelta::minutes(60),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = DashConfig::default().with_history_ttl(test.input).history_ttl;
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_table_rows_clamped() {
        struct TestCase {
            input: &'static str,
            expected: usize,
        }

        let tests = vec![
            TestCase {
                // TC0: zero rows
                input: "0",
                expected: 1,
            },
            TestCase {
                // TC1: within range
                input: "10",
                expected: 10,
            },
            TestCase {
                // TC2: would overflow the panel height
                input: "65533",
                expected: 50,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = DashConfig::from_lookup(lookup(&[("TABLE_ROWS", test.input)])).table_rows;
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_builder() {
        let config = DashConfig::default()
            .with_ticker("nvda")
            .with_speed(RefreshSpeed::Medium);

        assert_eq!(config.ticker, "NVDA");
        assert_eq!(config.speed, RefreshSpeed::Medium);
        assert_eq!(config.yahoo().timeout, Duration::from_secs(10));
    }
}
