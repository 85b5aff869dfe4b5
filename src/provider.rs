//! Market data provider for profitability calculations
//!
//! Fetches difficulty, block reward and price for one coin from the minerstat
//! coins API and validates the record into a [`CoinMarketSnapshot`].

use crate::utils::parse_finite;
use crate::{CoinMarketSnapshot, Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default minerstat API root
pub const DEFAULT_PROVIDER_URL: &str = "https://api.minerstat.com/";

/// Source of per-coin market data
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logging
    fn provider_name(&self) -> &'static str;

    /// Fetch and validate current data for a coin symbol
    async fn fetch_snapshot(&self, symbol: &str) -> Result<CoinMarketSnapshot>;
}

/// Raw coin record as returned by the provider
///
/// Fields arrive with loose types (numbers as strings, names as numbers), so
/// they are kept as raw values until validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinRecord {
    #[serde(default)]
    pub coin: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub algorithm: Option<Value>,
    #[serde(default)]
    pub difficulty: Option<Value>,
    #[serde(default)]
    pub reward_block: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub is_mineable: Option<Value>,
}

impl CoinRecord {
    /// Validate the record into a snapshot for `symbol`
    ///
    /// Only an explicit `false` mineable flag rejects the coin. A missing or
    /// unusable price is not an error.
    pub fn into_snapshot(self, symbol: &str) -> Result<CoinMarketSnapshot> {
        let name = text_value(self.name).unwrap_or_else(|| symbol.to_string());

        if matches!(self.is_mineable, Some(Value::Bool(false))) {
            let coin = text_value(self.coin).unwrap_or_else(|| symbol.to_string());
            return Err(Error::not_mineable(name, coin));
        }

        if let Some(algorithm) = text_value(self.algorithm) {
            debug!("{} mines with {}", symbol, algorithm);
        }

        let difficulty = self.difficulty.as_ref().and_then(numeric_value);
        let block_reward = self.reward_block.as_ref().and_then(numeric_value);
        let (difficulty, block_reward) = match (difficulty, block_reward) {
            (Some(difficulty), Some(block_reward)) => (difficulty, block_reward),
            _ => return Err(Error::incomplete_data(symbol)),
        };

        let price_usd = self.price.as_ref().and_then(numeric_value);
        if price_usd.is_none() {
            debug!("No usable price for {}, fiat figures will be omitted", symbol);
        }

        Ok(CoinMarketSnapshot {
            symbol: symbol.to_string(),
            name,
            difficulty,
            block_reward,
            price_usd,
            is_mineable: true,
            fetched_at: Utc::now(),
        })
    }
}

/// Keep a field only when it is a JSON string
fn text_value(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Whether a value is falsy: null, false, 0 or the empty string
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Read a finite number from a JSON number or numeric string
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()),
        Value::String(text) => parse_finite(text),
        _ => None,
    }
}

/// Pick the first record out of a provider response body
///
/// A body that is not an array, an empty array or a falsy first element means
/// the symbol is unavailable. A first element that is not an object is an
/// incomplete record.
pub fn first_record(body: Value, symbol: &str) -> Result<CoinRecord> {
    let record = match body {
        Value::Array(records) => records.into_iter().next(),
        _ => None,
    };

    match record {
        None => Err(Error::data_unavailable(symbol)),
        Some(record) if is_falsy(&record) => Err(Error::data_unavailable(symbol)),
        Some(record @ Value::Object(_)) => {
            serde_json::from_value(record).map_err(|_| Error::incomplete_data(symbol))
        }
        Some(_) => Err(Error::incomplete_data(symbol)),
    }
}

/// minerstat coins API client
#[derive(Debug)]
pub struct MinerstatClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl MinerstatClient {
    /// Create a new provider client
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())
            .map_err(|e| Error::config(format!("Invalid provider URL: {}", e)))?;

        // Keep any path prefix when joining endpoint paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("block-hit-calculator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    /// Send an API key with every request
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.is_empty());
        self
    }

    /// Build the coins endpoint URL for a symbol
    pub fn coins_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join("v2/coins")
            .map_err(|e| Error::config(format!("Failed to build coins URL: {}", e)))?;
        url.query_pairs_mut().append_pair("list", symbol);
        Ok(url)
    }

    /// Fetch the raw record for a symbol
    #[instrument(skip(self))]
    pub async fn fetch_record(&self, symbol: &str) -> Result<CoinRecord> {
        let url = self.coins_url(symbol)?;
        debug!("Fetching coin data from: {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }

        let response = request.send().await.map_err(Error::from)?;
        let status = response.status();

        if !status.is_success() {
            warn!("Provider returned HTTP {} for {}", status, symbol);
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string());
            return Err(Error::transport(reason));
        }

        let body: Value = response.json().await.map_err(Error::from)?;
        first_record(body, symbol)
    }
}

#[async_trait]
impl MarketDataProvider for MinerstatClient {
    fn provider_name(&self) -> &'static str {
        "minerstat"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<CoinMarketSnapshot> {
        let snapshot = self.fetch_record(symbol).await?.into_snapshot(symbol)?;

        info!(
            "Fetched {} data: difficulty={}, reward={}, price={:?}",
            symbol, snapshot.difficulty, snapshot.block_reward, snapshot.price_usd
        );

        Ok(snapshot)
    }
}
