//! Calculation workflow
//!
//! A [`Session`] owns the `Idle → Loading → Success | Error` cycle for one
//! calculator form. Each request gets a [`Ticket`]; only the newest ticket may
//! complete, so a slow response to a superseded request is dropped instead of
//! overwriting newer results.

use crate::calculator::{self, clamp_pool_fee, parse_hashrate};
use crate::catalog;
use crate::format::{self, ResultDisplay};
use crate::provider::MarketDataProvider;
use crate::share::ShareParams;
use crate::types::{CalculationInput, CalculationResult, CoinMarketSnapshot, HashrateUnit};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Raw form values, exactly as entered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub coin: Option<String>,
    pub hashrate: String,
    pub unit: String,
    pub pool_fee: String,
}

impl Default for CalculationRequest {
    fn default() -> Self {
        Self {
            coin: None,
            hashrate: String::new(),
            unit: HashrateUnit::default().label().to_string(),
            pool_fee: String::new(),
        }
    }
}

impl CalculationRequest {
    /// Create a request from form values
    pub fn new(
        coin: impl Into<String>,
        hashrate: impl Into<String>,
        unit: impl Into<String>,
        pool_fee: impl Into<String>,
    ) -> Self {
        Self {
            coin: Some(coin.into()),
            hashrate: hashrate.into(),
            unit: unit.into(),
            pool_fee: pool_fee.into(),
        }
    }

    /// Overwrite the fields a share link carries
    pub fn prefill(&mut self, params: &ShareParams) {
        if let Some(coin) = &params.coin {
            self.coin = Some(coin.clone());
        }
        if let Some(hashrate) = &params.hashrate {
            self.hashrate = hashrate.clone();
        }
        if let Some(unit) = &params.unit {
            self.unit = unit.clone();
        }
        if let Some(pool_fee) = &params.pool_fee {
            self.pool_fee = pool_fee.clone();
        }
    }

    /// Validate the form into calculation input
    ///
    /// Fails when no coin is selected or the hashrate is not a positive
    /// number. The pool fee never fails: it is clamped to [0, 100]. The
    /// symbol is trimmed and uppercased; symbols outside the built-in catalog
    /// are passed through to the provider.
    pub fn validate(&self) -> Result<CalculationInput> {
        let symbol = self
            .coin
            .as_deref()
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .ok_or_else(Error::invalid_input)?;
        let hashrate_value = parse_hashrate(&self.hashrate).ok_or_else(Error::invalid_input)?;

        Ok(CalculationInput {
            symbol: symbol.to_ascii_uppercase(),
            hashrate_value,
            hashrate_unit: self.unit.clone(),
            pool_fee_percent: clamp_pool_fee(&self.pool_fee),
        })
    }
}

/// A successful calculation with everything needed to show and share it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub input: CalculationInput,
    pub snapshot: CoinMarketSnapshot,
    pub result: CalculationResult,
    pub display: ResultDisplay,
    pub share: ShareParams,
}

/// Identifies one calculation request within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(u64);

/// Where the calculator currently is in its cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CalculationState {
    Idle,
    Loading { ticket: Ticket },
    Success { calculation: Box<Calculation> },
    Error { message: String, category: &'static str },
}

/// Calculator form session
#[derive(Debug)]
pub struct Session {
    state: CalculationState,
    display: ResultDisplay,
    last_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an idle session
    pub fn new() -> Self {
        Self {
            state: CalculationState::Idle,
            display: ResultDisplay::reset(),
            last_ticket: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &CalculationState {
        &self.state
    }

    /// Current result fields
    pub fn display(&self) -> &ResultDisplay {
        &self.display
    }

    /// Whether a request is outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self.state, CalculationState::Loading { .. })
    }

    /// Start a new request, superseding any outstanding one
    pub fn begin(&mut self) -> Ticket {
        if let CalculationState::Loading { ticket } = self.state {
            debug!("Superseding outstanding calculation {:?}", ticket);
        }

        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.state = CalculationState::Loading { ticket };
        self.display = ResultDisplay::loading();
        ticket
    }

    /// Complete a request
    ///
    /// Returns `false` and leaves the session untouched when `ticket` is not
    /// the newest outstanding request.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<Calculation>) -> bool {
        if self.state != (CalculationState::Loading { ticket }) {
            debug!("Ignoring stale calculation result {:?}", ticket);
            return false;
        }

        match outcome {
            Ok(calculation) => {
                info!(
                    "Calculation for {} complete: {} / {}",
                    calculation.input.symbol,
                    calculation.display.time_text,
                    calculation.display.coin_earnings_text
                );
                self.display = calculation.display.clone();
                self.state = CalculationState::Success {
                    calculation: Box::new(calculation),
                };
            }
            Err(e) => {
                warn!("Calculation failed ({}): {}", e.category(), e);
                self.display = ResultDisplay::reset();
                self.state = CalculationState::Error {
                    message: e.to_string(),
                    category: e.category(),
                };
            }
        }
        true
    }

    /// Run one full calculation: validate, fetch, compute, format
    ///
    /// The session always leaves `Loading` before this returns.
    pub async fn run<P>(&mut self, provider: &P, request: &CalculationRequest) -> &CalculationState
    where
        P: MarketDataProvider + ?Sized,
    {
        let ticket = self.begin();
        let outcome = evaluate(provider, request).await;
        self.finish(ticket, outcome);
        &self.state
    }
}

/// Evaluate a request against a provider without touching any session
pub async fn evaluate<P>(provider: &P, request: &CalculationRequest) -> Result<Calculation>
where
    P: MarketDataProvider + ?Sized,
{
    let input = request.validate()?;
    match catalog::find(&input.symbol) {
        Some((algorithm, coin)) => debug!("Selected {} ({})", coin.name, algorithm),
        None => debug!("{} is not in the built-in catalog", input.symbol),
    }
    if input.unit().is_none() {
        warn!(
            "Unrecognized hashrate unit {:?}, treating value as H/s",
            input.hashrate_unit
        );
    }

    info!(
        "Calculating {} at {} via {}",
        input.symbol,
        input.hash_rate(),
        provider.provider_name()
    );

    let snapshot = provider.fetch_snapshot(&input.symbol).await?;
    let result = calculator::calculate(&input, &snapshot);
    let display = format::format_results(&result, &input.symbol, snapshot.price_usd);
    let share = ShareParams::from_input(&input);

    Ok(Calculation {
        input,
        snapshot,
        result,
        display,
        share,
    })
}
