//! Error taxonomy for the data-contract boundaries of the admission engine.
//!
//! Arithmetic inside the decision core is total: degenerate denominators are
//! floored, never propagated. Conditions only arise where the external
//! payload fails to satisfy its contract, or where a caller reads game
//! counters outside the `running` state.

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, AdmissionError>;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("missing attribute statistic for {attribute:?}")]
    MissingStatistic { attribute: String },

    #[error("missing correlation entry for ({a:?}, {b:?})")]
    MissingCorrelation { a: String, b: String },

    #[error("constraint references unknown attribute {attribute:?}")]
    UnknownConstraint { attribute: String },

    #[error("game is not running (status = {status})")]
    GameNotRunning { status: String },
}
