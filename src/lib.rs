//! Block Hit Calculator
//!
//! Mining profitability estimates from live network data:
//! - Expected time for a hashrate to find a block
//! - Expected daily earnings in coin and in USD
//! - Static coin catalog with search
//! - Shareable query-string links that reproduce a calculation

pub mod config;
pub mod error;
pub mod types;
pub mod calculator;
pub mod format;
pub mod catalog;
pub mod provider;
pub mod share;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use provider::{MarketDataProvider, MinerstatClient};
pub use session::{Calculation, CalculationRequest, CalculationState, Session};
pub use types::*;

/// Application information
pub const APP_NAME: &str = "block-hit-calculator";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
