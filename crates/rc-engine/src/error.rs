//! Error types for the ReelCore engine

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid bet: {0}")]
    InvalidBet(f64),

    #[error("invalid active line count: {0}")]
    InvalidLineCount(u8),

    #[error("insufficient funds for bet of {0}")]
    InsufficientFunds(f64),

    #[error("rng failure: {0}")]
    Rng(String),

    #[error("bonus state desync: round marked active with no spins remaining")]
    StateDesync,

    #[error("spin already in flight for this session")]
    SpinInFlight,

    #[error("invalid config: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger error: {0}")]
    Ledger(String),
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
