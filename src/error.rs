//! Error handling for the block hit calculator
//!
//! One error type covers the whole calculation workflow. Every variant renders
//! as a short, user-facing message; `category()` groups them for logging.

use thiserror::Error;

/// Result type alias for calculator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when the form is missing a coin or a usable hashrate
pub const INVALID_INPUT_MESSAGE: &str =
    "Please select a cryptocurrency and enter a valid hashrate.";

/// Main error type for the block hit calculator
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level request failures (connect, timeout, body read)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success HTTP status
    #[error("Network error: {status}")]
    Transport { status: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Form input rejected before any request is made
    #[error("{message}")]
    InvalidInput { message: String },

    /// Provider returned no record for the symbol
    #[error("Data for {symbol} is not available.")]
    DataUnavailable { symbol: String },

    /// Provider flagged the coin as not mineable
    #[error("{name} ({symbol}) is not mineable.")]
    NotMineable { name: String, symbol: String },

    /// Difficulty or block reward missing from the provider record
    #[error("Incomplete data received for {symbol}.")]
    IncompleteData { symbol: String },

    /// Generic errors with context
    #[error("Error in {context}: {message}")]
    Generic { context: String, message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an input validation error with the standard form message
    pub fn invalid_input() -> Self {
        Self::InvalidInput {
            message: INVALID_INPUT_MESSAGE.to_string(),
        }
    }

    /// Create a transport error from an HTTP status description
    pub fn transport(status: impl Into<String>) -> Self {
        Self::Transport {
            status: status.into(),
        }
    }

    /// Create a data unavailable error
    pub fn data_unavailable(symbol: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
        }
    }

    /// Create a not mineable error
    pub fn not_mineable(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::NotMineable {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Create an incomplete data error
    pub fn incomplete_data(symbol: impl Into<String>) -> Self {
        Self::IncompleteData {
            symbol: symbol.into(),
        }
    }

    /// Create a generic error with context
    pub fn generic(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generic {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Http(_) | Error::Transport { .. } => "transport",
            Error::Json(_) => "json",
            Error::Yaml(_) => "yaml",
            Error::Io(_) => "io",
            Error::Config { .. } => "config",
            Error::InvalidInput { .. } => "input_validation",
            Error::DataUnavailable { .. } => "data_unavailable",
            Error::NotMineable { .. } => "not_mineable",
            Error::IncompleteData { .. } => "incomplete_data",
            Error::Generic { .. } => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_messages() {
        assert_eq!(Error::invalid_input().to_string(), INVALID_INPUT_MESSAGE);
        assert_eq!(
            Error::data_unavailable("BTC").to_string(),
            "Data for BTC is not available."
        );
        assert_eq!(
            Error::not_mineable("Tether", "USDT").to_string(),
            "Tether (USDT) is not mineable."
        );
        assert_eq!(
            Error::incomplete_data("XMR").to_string(),
            "Incomplete data received for XMR."
        );
        assert_eq!(
            Error::transport("Service Unavailable").to_string(),
            "Network error: Service Unavailable"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(Error::invalid_input().category(), "input_validation");
        assert_eq!(Error::transport("Not Found").category(), "transport");
        assert_eq!(Error::data_unavailable("BTC").category(), "data_unavailable");
        assert_eq!(Error::not_mineable("a", "b").category(), "not_mineable");
        assert_eq!(Error::incomplete_data("BTC").category(), "incomplete_data");
        assert_eq!(Error::config("bad").category(), "config");
    }
}
