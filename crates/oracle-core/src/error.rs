//! Structured error types for the detection core.
//!
//! Stale data and insufficient-source conditions are modeled as `None`
//! returns rather than errors — see `aggregator.rs`. The variants below are
//! for faults a caller cannot simply read off an `Option`: a malformed
//! pool pair, a degenerate numeric input, a clock fault, or a handler that
//! panicked or returned an error of its own.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("pool pair must share exactly one token in each direction, found {shared} shared tokens")]
    InvalidPoolPair { shared: usize },

    #[error("degenerate input in {context}: {reason}")]
    Degenerate { context: String, reason: String },

    #[error("system clock error while stamping {context}")]
    ClockError { context: String },

    #[error("opportunity handler failed: {reason}")]
    HandlerFailure { reason: String },
}
