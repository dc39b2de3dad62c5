use crate::models::Side;
use thiserror::Error;

/// Startup configuration failures. Raised before any request is made so a
/// missing credential surfaces here instead of as a brokerage auth rejection.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },
}

/// Failure fetching the shared reference quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("quote endpoint returned HTTP {0}")]
    Status(u16),
}

/// Per-ratio submission failure. Isolated to its own ratio; siblings in the
/// same dispatch are unaffected.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(
        "stop loss or take profit rounds to zero ({side}): take profit {take_profit:.2}, stop loss {stop_loss:.2}"
    )]
    ZeroBracketPrice {
        side: Side,
        take_profit: f64,
        stop_loss: f64,
    },

    #[error("order request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("brokerage rejected order (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("order task aborted: {0}")]
    Join(String),
}

/// Fatal dispatch failure. The quote fetch is the one point of failure shared
/// by every ratio; everything downstream is reported per ratio instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to fetch reference quote: {0}")]
    Quote(#[from] QuoteError),
}
