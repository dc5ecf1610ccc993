//! Pipe-delimited line format shared by every store.
//!
//! ```text
//! accounts:      number|customer name|balance|withdrawn today|last interest month
//! transactions:  number|type|amount|timestamp|remark
//! ```
//!
//! Fields are not escaped: a `|` inside a name or remark yields a line with
//! the wrong field count, which is skipped when read back. A line break
//! would split one record into two, so the engine refuses names that
//! contain one.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::backend::interface::{Loaded, SkippedRecord};
use crate::core::transaction::{TransactionKind, TIMESTAMP_FORMAT};
use crate::core::{Account, Amount, Ledger, Transaction, YearMonth};

const SEPARATOR: char = '|';
const FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedRecord {
    #[error("expected {expected} fields, found {found}")]
    FieldCount {
        expected: usize,
        found: usize
    },
    #[error("{field} is not a number: {value:?}")]
    Number {
        field: &'static str,
        value: String
    },
    #[error("unknown transaction type {0:?}")]
    Kind(String),
    #[error("bad timestamp {0:?}")]
    Timestamp(String),
    #[error("bad interest month {0:?}")]
    YearMonth(String)
}

fn split(line: &str) -> Result<Vec<&str>, MalformedRecord> {
    let fields: Vec<&str> = line.split(SEPARATOR).collect();
    if fields.len() != FIELDS {
        return Err(MalformedRecord::FieldCount { expected: FIELDS, found: fields.len() });
    }
    return Ok(fields);
}

fn parse_amount(field: &'static str, value: &str) -> Result<Amount, MalformedRecord> {
    value.parse().map_err(|_| MalformedRecord::Number { field, value: value.to_owned() })
}

pub fn encode_account(account: &Account) -> String {
    let interest = account.last_interest_applied()
        .map(|stamp| stamp.to_string())
        .unwrap_or_default();
    format!("{}|{}|{}|{}|{}",
        account.number(), account.customer_name(), account.balance(),
        account.withdrawn_today(), interest)
}

/// Decoded accounts carry the default daily limit; it is not part of the line.
pub fn decode_account(line: &str) -> Result<Account, MalformedRecord> {
    let fields = split(line)?;
    let mut account = Account::new(fields[0], fields[1]);
    account.balance = parse_amount("balance", fields[2])?;
    account.withdrawn_today = parse_amount("withdrawn today", fields[3])?;
    account.last_interest_applied = match fields[4] {
        "" => None,
        stamp => Some(stamp.parse::<YearMonth>()
            .map_err(|_| MalformedRecord::YearMonth(stamp.to_owned()))?)
    };
    return Ok(account);
}

pub fn encode_transaction(transaction: &Transaction) -> String {
    format!("{}|{}|{}|{}|{}",
        transaction.account_number(), transaction.kind(), transaction.amount(),
        transaction.timestamp().format(TIMESTAMP_FORMAT), transaction.remark().unwrap_or(""))
}

pub fn decode_transaction(line: &str) -> Result<Transaction, MalformedRecord> {
    let fields = split(line)?;
    let kind: TransactionKind = fields[1].parse()
        .map_err(|_| MalformedRecord::Kind(fields[1].to_owned()))?;
    let amount = parse_amount("amount", fields[2])?;
    let timestamp = NaiveDateTime::parse_from_str(fields[3], TIMESTAMP_FORMAT)
        .map_err(|_| MalformedRecord::Timestamp(fields[3].to_owned()))?;
    return Ok(Transaction::at(fields[0], kind, amount, timestamp, Some(fields[4])));
}

fn encode_lines<T>(records: &[T], encode: fn(&T) -> String) -> String {
    let mut text = String::new();
    for record in records {
        text.push_str(&encode(record));
        text.push('\n');
    }
    text
}

fn decode_lines<T>(file: &str, text: &str, decode: fn(&str) -> Result<T, MalformedRecord>,
                   skipped: &mut Vec<SkippedRecord>) -> Vec<T> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedRecord { file: file.to_owned(), line: index + 1, reason })
        }
    }
    records
}

/// Renders the ledger as `(accounts text, transactions text)`, one record per line.
pub fn encode_ledger(ledger: &Ledger) -> (String, String) {
    (encode_lines(ledger.accounts(), encode_account),
     encode_lines(ledger.history(), encode_transaction))
}

pub fn decode_ledger(accounts_file: &str, accounts: &str, transactions_file: &str, transactions: &str) -> Loaded {
    let mut skipped = Vec::new();
    let accounts = decode_lines(accounts_file, accounts, decode_account, &mut skipped);
    let history = decode_lines(transactions_file, transactions, decode_transaction, &mut skipped);
    Loaded { ledger: Ledger::from_parts(accounts, history), skipped }
}
