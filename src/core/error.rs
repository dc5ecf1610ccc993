use thiserror::Error;

use crate::backend::BackendError;
use crate::core::Amount;

/// Reasons an account refuses a withdrawal. None of them mutate the account.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WithdrawError {
    /// Occurs when the requested amount is zero, negative or not finite.
    #[error("invalid amount: {0}")]
    InvalidAmount(Amount),
    /// Occurs when the requested amount exceeds the current balance.
    #[error("insufficient funds: requested {requested} with {available} available")]
    InsufficientFunds {
        requested: Amount,
        available: Amount
    },
    /// Occurs when the withdrawal would push the cumulative amount
    /// withdrawn past the account's daily cap.
    #[error("daily withdrawal limit exceeded: {withdrawn_today} already withdrawn, {requested} requested, limit {limit}")]
    DailyLimitExceeded {
        requested: Amount,
        withdrawn_today: Amount,
        limit: Amount
    }
}

#[derive(Debug, Error)]
pub enum BankError {
    /// Occurs when an operation names an account number not on the ledger.
    #[error("no such account: {0}")]
    UnknownAccount(String),
    /// Occurs when a customer name would break the line-based storage.
    #[error("invalid customer name {0:?}: line breaks are not allowed")]
    InvalidName(String),
    /// The operation was applied in memory, but persisting it failed.
    #[error("failed to persist ledger: {0}")]
    Store(#[from] BackendError)
}

pub type BankResult<T> = Result<T, BankError>;
