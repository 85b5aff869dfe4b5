//! Shareable calculator links
//!
//! Form state is mirrored into a query string with the keys `c` (coin),
//! `h` (hashrate), `u` (unit) and `f` (pool fee percent), so a link reproduces
//! the same calculation when opened again.

use crate::types::CalculationInput;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use url::Url;

pub const COIN_KEY: &str = "c";
pub const HASHRATE_KEY: &str = "h";
pub const UNIT_KEY: &str = "u";
pub const POOL_FEE_KEY: &str = "f";

/// Title used for the embedded calculator frame
pub const EMBED_TITLE: &str = "Block Hit Calculator";

/// Calculator parameters carried by a share link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareParams {
    pub coin: Option<String>,
    pub hashrate: Option<String>,
    pub unit: Option<String>,
    pub pool_fee: Option<String>,
}

impl ShareParams {
    /// Parse a query string, with or without the leading `?`
    ///
    /// The first occurrence of a key wins and empty values count as absent.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                COIN_KEY => &mut params.coin,
                HASHRATE_KEY => &mut params.hashrate,
                UNIT_KEY => &mut params.unit,
                POOL_FEE_KEY => &mut params.pool_fee,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    /// Parse the query of a full page URL
    pub fn from_url(url: &Url) -> Self {
        url.query().map(Self::from_query).unwrap_or_default()
    }

    /// Parameters describing a completed calculation
    pub fn from_input(input: &CalculationInput) -> Self {
        Self {
            coin: Some(input.symbol.clone()),
            hashrate: Some(input.hashrate_value.to_string()),
            unit: Some(input.hashrate_unit.clone()),
            pool_fee: Some(input.pool_fee_percent.to_string()),
        }
    }

    /// A link triggers a calculation on load only when coin, hashrate and
    /// unit are all present; the pool fee alone never does
    pub fn should_auto_calculate(&self) -> bool {
        self.coin.is_some() && self.hashrate.is_some() && self.unit.is_some()
    }

    /// Encode as a query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Replace the query of a page URL with these parameters
    pub fn share_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        let query = self.to_query_string();
        url.set_query((!query.is_empty()).then_some(query.as_str()));
        url
    }

    fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (COIN_KEY, &self.coin),
            (HASHRATE_KEY, &self.hashrate),
            (UNIT_KEY, &self.unit),
            (POOL_FEE_KEY, &self.pool_fee),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (key, value)))
    }
}

/// HTML snippet embedding the calculator page at `url`
pub fn embed_code(url: &Url) -> String {
    format!(
        "<iframe src=\"{}\" width=\"360\" height=\"420\" style=\"border:0; border-radius:12px; overflow:hidden;\" title=\"{}\"></iframe>",
        url, EMBED_TITLE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let params = ShareParams::from_query("?c=BTC&h=100&u=TH%2Fs&f=1.5");
        assert_eq!(params.coin.as_deref(), Some("BTC"));
        assert_eq!(params.hashrate.as_deref(), Some("100"));
        assert_eq!(params.unit.as_deref(), Some("TH/s"));
        assert_eq!(params.pool_fee.as_deref(), Some("1.5"));
        assert!(params.should_auto_calculate());
    }

    #[test]
    fn test_partial_query_does_not_auto_calculate() {
        let params = ShareParams::from_query("c=LTC&h=500");
        assert!(!params.should_auto_calculate());

        let params = ShareParams::from_query("f=2");
        assert_eq!(params.pool_fee.as_deref(), Some("2"));
        assert!(!params.should_auto_calculate());

        let params = ShareParams::from_query("c=&h=1&u=MH/s");
        assert_eq!(params.coin, None);
        assert!(!params.should_auto_calculate());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = ShareParams::from_query("c=BTC&c=LTC&x=1");
        assert_eq!(params.coin.as_deref(), Some("BTC"));
    }

    #[test]
    fn test_to_query_string() {
        let params = ShareParams {
            coin: Some("BTC".to_string()),
            hashrate: Some("100".to_string()),
            unit: Some("TH/s".to_string()),
            pool_fee: Some("1".to_string()),
        };
        assert_eq!(params.to_query_string(), "c=BTC&h=100&u=TH%2Fs&f=1");

        assert_eq!(ShareParams::default().to_query_string(), "");
    }

    #[test]
    fn test_from_input_formats_numbers() {
        let input = CalculationInput {
            symbol: "DOGE".to_string(),
            hashrate_value: 2.5,
            hashrate_unit: "GH/s".to_string(),
            pool_fee_percent: 0.0,
        };
        let params = ShareParams::from_input(&input);
        assert_eq!(params.to_query_string(), "c=DOGE&h=2.5&u=GH%2Fs&f=0");
    }

    #[test]
    fn test_share_url_and_embed() {
        let base = Url::parse("https://example.com/calc?old=1#top").unwrap();
        let params = ShareParams::from_query("c=XMR&h=15&u=kH/s");
        let url = params.share_url(&base);
        assert_eq!(url.as_str(), "https://example.com/calc?c=XMR&h=15&u=kH%2Fs#top");
        assert_eq!(ShareParams::from_url(&url), params);

        let embed = embed_code(&url);
        assert!(embed.starts_with("<iframe src=\"https://example.com/calc?c=XMR"));
        assert!(embed.contains("width=\"360\" height=\"420\""));
        assert!(embed.ends_with("title=\"Block Hit Calculator\"></iframe>"));
    }
}
