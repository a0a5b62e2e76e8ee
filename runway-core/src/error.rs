//! Engine error type.
//!
//! Only malformed configuration is an error. Everything else the engine meets
//! (negative pools, finished goals, empty goal lists) is an ordinary branch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(
        "forecast horizon must be 1 to {max} months (got {months})",
        max = crate::config::MAX_FORECAST_MONTHS
    )]
    InvalidHorizon { months: u32 },

    #[error("invalid month '{0}': expected YYYY-MM or YYYY-MM-DD")]
    InvalidMonthKey(String),

    #[error("{field} must be a finite number")]
    NonFiniteAmount { field: &'static str },
}

pub type Result<T> = std::result::Result<T, EngineError>;
