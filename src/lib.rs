mod core;
pub mod backend;
pub mod config;

pub use crate::core::{Account, Bank, BankPolicy, Ledger, Transaction, TransactionKind, YearMonth};
pub use crate::core::{AccountSummary, Amount, BankError, BankResult, InterestReport, WithdrawError, WithdrawOutcome};
pub use crate::core::{account, bank, ledger, transaction, year_month};
