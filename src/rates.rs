//! Exchange rate fetching abstractions.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Snapshot of currency code to exchange rate, relative to the base it was
/// requested for. Valid only for the request that produced it.
pub type RateMap = HashMap<String, f64>;

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, base: &str) -> Result<RateMap>;
}
