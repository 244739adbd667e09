use crate::{bar::Bar, error::DataError, provider::MarketDataProvider};
use std::sync::Arc;
use tracing::debug;

/// Samples the most recent intraday bar on each refresh tick. No retry: a failed sample is
/// returned to the caller and the next tick simply asks again.
#[derive(Clone)]
pub struct LiveSampler {
    provider: Arc<dyn MarketDataProvider>,
}

impl LiveSampler {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn sample(&self, ticker: &str) -> Result<Bar, DataError> {
        let bar = self.provider.fetch_latest_bar(ticker).await?;
        debug!(ticker, time = %bar.time, close = bar.close, "sampled live bar");
        Ok(bar)
    }
}
