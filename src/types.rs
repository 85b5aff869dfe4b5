//! Core types for profitability calculations
//!
//! Transient value types: each one is built for a single calculation and
//! dropped afterwards. None of them carry identity or are mutated after
//! construction.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hashrate unit offered by the calculator form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashrateUnit {
    #[serde(rename = "H/s")]
    Hash,
    #[serde(rename = "kH/s")]
    KiloHash,
    #[serde(rename = "MH/s")]
    MegaHash,
    #[serde(rename = "GH/s")]
    GigaHash,
    #[default]
    #[serde(rename = "TH/s")]
    TeraHash,
    #[serde(rename = "PH/s")]
    PetaHash,
    #[serde(rename = "EH/s")]
    ExaHash,
}

impl HashrateUnit {
    /// All units, smallest first
    pub const ALL: [HashrateUnit; 7] = [
        HashrateUnit::Hash,
        HashrateUnit::KiloHash,
        HashrateUnit::MegaHash,
        HashrateUnit::GigaHash,
        HashrateUnit::TeraHash,
        HashrateUnit::PetaHash,
        HashrateUnit::ExaHash,
    ];

    /// Display label, also used as the form and query-string value
    pub fn label(&self) -> &'static str {
        match self {
            HashrateUnit::Hash => "H/s",
            HashrateUnit::KiloHash => "kH/s",
            HashrateUnit::MegaHash => "MH/s",
            HashrateUnit::GigaHash => "GH/s",
            HashrateUnit::TeraHash => "TH/s",
            HashrateUnit::PetaHash => "PH/s",
            HashrateUnit::ExaHash => "EH/s",
        }
    }

    /// Power-of-ten multiplier to hashes per second
    pub fn multiplier(&self) -> f64 {
        match self {
            HashrateUnit::Hash => 1.0,
            HashrateUnit::KiloHash => 1e3,
            HashrateUnit::MegaHash => 1e6,
            HashrateUnit::GigaHash => 1e9,
            HashrateUnit::TeraHash => 1e12,
            HashrateUnit::PetaHash => 1e15,
            HashrateUnit::ExaHash => 1e18,
        }
    }

    /// Look up a unit by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|unit| unit.label() == label)
    }

    /// Multiplier for a label, falling back to 1 for unknown labels
    pub fn multiplier_for(label: &str) -> f64 {
        Self::from_label(label).map_or(1.0, |unit| unit.multiplier())
    }

    /// Convert a value in this unit to hashes per second
    pub fn normalize(&self, value: f64) -> HashRate {
        HashRate::new(value * self.multiplier())
    }
}

impl FromStr for HashrateUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_label(s.trim())
            .ok_or_else(|| Error::config(format!("Unknown hashrate unit: {}", s)))
    }
}

impl fmt::Display for HashrateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hash rate in hashes per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct HashRate(pub f64);

impl HashRate {
    /// Create new hash rate
    pub fn new(rate: f64) -> Self {
        Self(rate)
    }

    /// Get the rate value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for HashRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_hash_rate(self.0))
    }
}

/// Network and market data for one coin, as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarketSnapshot {
    pub symbol: String,
    pub name: String,
    pub difficulty: f64,
    pub block_reward: f64,
    /// `None` when the provider has no usable price
    pub price_usd: Option<f64>,
    pub is_mineable: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Validated form input for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub symbol: String,
    pub hashrate_value: f64,
    /// Unit label as selected; unknown labels normalize with multiplier 1
    pub hashrate_unit: String,
    /// Already clamped to [0, 100]
    pub pool_fee_percent: f64,
}

impl CalculationInput {
    /// Recognized unit, if the label is one of the fixed units
    pub fn unit(&self) -> Option<HashrateUnit> {
        HashrateUnit::from_label(&self.hashrate_unit)
    }

    /// Hashrate in hashes per second
    pub fn hash_rate(&self) -> HashRate {
        HashRate::new(crate::calculator::normalize_hashrate(
            self.hashrate_value,
            &self.hashrate_unit,
        ))
    }
}

/// Derived profitability figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Expected seconds until this hashrate finds a block; zero difficulty
    /// yields a non-positive value that displays as "Never"
    pub time_to_find_seconds: f64,
    pub daily_earnings_coin: f64,
    pub daily_earnings_usd: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_multipliers() {
        let expected = [1.0, 1e3, 1e6, 1e9, 1e12, 1e15, 1e18];
        for (unit, multiplier) in HashrateUnit::ALL.iter().zip(expected) {
            assert_eq!(unit.multiplier(), multiplier);
        }
    }

    #[test]
    fn test_unit_labels_round_trip() {
        for unit in HashrateUnit::ALL {
            assert_eq!(HashrateUnit::from_label(unit.label()), Some(unit));
            assert_eq!(unit.label().parse::<HashrateUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(HashrateUnit::from_label("th/s"), None);
        assert_eq!(HashrateUnit::multiplier_for("Sol/s"), 1.0);
        assert!("ZH/s".parse::<HashrateUnit>().is_err());
    }

    #[test]
    fn test_unit_serde_uses_labels() {
        let json = serde_json::to_string(&HashrateUnit::GigaHash).unwrap();
        assert_eq!(json, "\"GH/s\"");
        let unit: HashrateUnit = serde_json::from_str("\"kH/s\"").unwrap();
        assert_eq!(unit, HashrateUnit::KiloHash);
    }

    #[test]
    fn test_input_hash_rate() {
        let input = CalculationInput {
            symbol: "LTC".to_string(),
            hashrate_value: 2.5,
            hashrate_unit: "GH/s".to_string(),
            pool_fee_percent: 0.0,
        };
        assert_eq!(input.unit(), Some(HashrateUnit::GigaHash));
        assert_eq!(input.hash_rate().value(), 2.5e9);
    }
}
