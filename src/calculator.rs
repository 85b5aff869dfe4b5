//! Profitability calculation core
//!
//! Pure, synchronous functions: no I/O, no state. Input validation happens in
//! the caller; these functions only assume what their docs state.

use crate::types::{CalculationInput, CalculationResult, CoinMarketSnapshot, HashrateUnit};
use crate::utils::{clamp, parse_finite};

/// Expected hash attempts per unit of difficulty (2^32)
pub const DIFFICULTY_CONSTANT: f64 = 4_294_967_296.0;

/// Seconds in one day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Expected block time and daily reward for a hashrate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profitability {
    pub time_to_find_seconds: f64,
    pub daily_earnings_coin: f64,
}

/// Convert a hashrate value in the given unit label to hashes per second
///
/// Unknown unit labels multiply by 1.
pub fn normalize_hashrate(value: f64, unit: &str) -> f64 {
    value * HashrateUnit::multiplier_for(unit)
}

/// Clamp a raw pool fee entry to a percentage in [0, 100]
///
/// Empty, non-numeric or NaN entries count as 0.
pub fn clamp_pool_fee(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        match crate::utils::parse_leading_float(trimmed) {
            Some(v) if !v.is_nan() => v,
            _ => 0.0,
        }
    };
    clamp(value, 0.0, 100.0)
}

/// Apply the profitability formula
///
/// `hashrate_hs` must be positive. A zero difficulty produces a zero block
/// time and infinite earnings instead of panicking.
pub fn compute_profitability(
    hashrate_hs: f64,
    difficulty: f64,
    block_reward: f64,
    pool_fee_percent: f64,
) -> Profitability {
    let expected_hashes = difficulty * DIFFICULTY_CONSTANT;
    let time_to_find_seconds = expected_hashes / hashrate_hs;
    let daily_earnings_coin = (hashrate_hs * block_reward * SECONDS_PER_DAY) / expected_hashes
        * (1.0 - pool_fee_percent / 100.0);

    Profitability {
        time_to_find_seconds,
        daily_earnings_coin,
    }
}

/// Run a full calculation for validated input against a market snapshot
pub fn calculate(input: &CalculationInput, snapshot: &CoinMarketSnapshot) -> CalculationResult {
    let hashrate_hs = normalize_hashrate(input.hashrate_value, &input.hashrate_unit);
    let profitability = compute_profitability(
        hashrate_hs,
        snapshot.difficulty,
        snapshot.block_reward,
        input.pool_fee_percent,
    );

    CalculationResult {
        time_to_find_seconds: profitability.time_to_find_seconds,
        daily_earnings_coin: profitability.daily_earnings_coin,
        daily_earnings_usd: snapshot
            .price_usd
            .map(|price| profitability.daily_earnings_coin * price),
    }
}

/// Parse a raw hashrate entry, accepting only finite positive values
pub fn parse_hashrate(raw: &str) -> Option<f64> {
    parse_finite(raw).filter(|value| *value > 0.0)
}
