//! Display formatting for calculation results
//!
//! Everything here is pure string formatting. Missing or non-finite numbers
//! never produce an error; they render as a placeholder instead.

use crate::types::{CalculationResult, HashrateUnit};
use serde::{Deserialize, Serialize};

/// Shown for a block time that will not happen in practice
pub const NEVER: &str = "Never";

/// Shown when a figure is unknown, such as the price
pub const UNKNOWN: &str = "—";

/// Shown in every field after a failed calculation
pub const RESET: &str = "-";

/// Shown in every field while a calculation is in flight
pub const LOADING: &str = "...";

/// Mean Gregorian month length in days
const DAYS_PER_MONTH: f64 = 30.437;

/// Mean Gregorian year length in days
const DAYS_PER_YEAR: f64 = 365.25;

/// Rendered result fields, one per output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDisplay {
    pub time_text: String,
    pub coin_earnings_text: String,
    pub price_text: String,
    pub usd_earnings_text: String,
}

impl ResultDisplay {
    fn filled(text: &str) -> Self {
        Self {
            time_text: text.to_string(),
            coin_earnings_text: text.to_string(),
            price_text: text.to_string(),
            usd_earnings_text: text.to_string(),
        }
    }

    /// Display while a calculation is pending
    pub fn loading() -> Self {
        Self::filled(LOADING)
    }

    /// Display after a calculation failed
    pub fn reset() -> Self {
        Self::filled(RESET)
    }
}

/// Fixed-point text rounded half away from zero
///
/// `format!` alone rounds exact ties to even, so 1.25 would print as "1.2".
fn to_fixed(value: f64, decimals: i32) -> String {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    format!("{:.*}", decimals as usize, rounded)
}

/// Format an expected block time as a human-readable string
///
/// Walks up seconds, minutes, hours, days, months and years, stopping at the
/// first unit where the value is strictly below the next threshold.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return NEVER.to_string();
    }
    if seconds < 60.0 {
        return format!("{} seconds", to_fixed(seconds, 1));
    }
    let minutes = seconds / 60.0;
    if minutes < 60.0 {
        return format!("{} minutes", to_fixed(minutes, 1));
    }
    let hours = minutes / 60.0;
    if hours < 24.0 {
        return format!("{} hours", to_fixed(hours, 1));
    }
    let days = hours / 24.0;
    if days < DAYS_PER_MONTH {
        return format!("{} days", to_fixed(days, 1));
    }
    let months = days / DAYS_PER_MONTH;
    if months < 12.0 {
        return format!("{} months", to_fixed(months, 1));
    }
    format!("{} years", to_fixed(days / DAYS_PER_YEAR, 2))
}

/// Format a coin quantity with six decimals and the coin symbol
pub fn format_coin_amount(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return UNKNOWN.to_string();
    }
    format!("{} {}", to_fixed(amount, 6), symbol)
}

/// Format a USD amount as `$1,234.56`
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return UNKNOWN.to_string();
    }

    let fixed = to_fixed(amount.abs(), 2);
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render a calculation result for display
///
/// A missing price is a normal input: both fiat fields show [`UNKNOWN`].
pub fn format_results(
    result: &CalculationResult,
    coin_symbol: &str,
    price_usd: Option<f64>,
) -> ResultDisplay {
    ResultDisplay {
        time_text: format_duration(result.time_to_find_seconds),
        coin_earnings_text: format_coin_amount(result.daily_earnings_coin, coin_symbol),
        price_text: price_usd.map_or_else(|| UNKNOWN.to_string(), format_usd),
        usd_earnings_text: match price_usd {
            Some(price) => {
                let daily = result.daily_earnings_coin * price;
                if daily.is_finite() {
                    format!("{}/day", format_usd(daily))
                } else {
                    UNKNOWN.to_string()
                }
            }
            None => UNKNOWN.to_string(),
        },
    }
}

/// Format hash rate as a human-readable string
pub fn format_hash_rate(hashes_per_sec: f64) -> String {
    let units = HashrateUnit::ALL;
    let mut rate = hashes_per_sec;
    let mut unit_index = 0;

    while rate >= 1000.0 && unit_index < units.len() - 1 {
        rate /= 1000.0;
        unit_index += 1;
    }

    format!("{:.2} {}", rate, units[unit_index])
}
