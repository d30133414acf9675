use rust_decimal::Decimal;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type that captures the ledger's deterministic validation failures.
///
/// Every variant is detected before any mutation takes place, so a returned
/// error always means balance and history are unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Account number already exists: {0}")]
    DuplicateAccount(String),
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
