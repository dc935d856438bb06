//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure of a ledger operation.
///
/// `InvalidInput` and `NotFound` are deterministic, user-correctable
/// failures raised before any write happens. `Storage` means the atomic
/// unit of work could not commit; by contract nothing was applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A value failed validation (e.g. non-positive quantity, unknown movement type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The persistence layer failed; the unit of work was not applied.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
