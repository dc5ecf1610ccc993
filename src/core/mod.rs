pub mod account;
pub mod bank;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod year_month;

pub use account::Account;
pub use bank::{Bank, BankPolicy, AccountSummary, WithdrawOutcome, InterestReport};
pub use error::{BankError, BankResult, WithdrawError};
pub use ledger::Ledger;
pub use transaction::{Amount, Transaction, TransactionKind};
pub use year_month::YearMonth;
