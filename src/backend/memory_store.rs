use std::cell::{Cell, RefCell};
use std::io;
use std::path::PathBuf;

use crate::backend::codec;
use crate::backend::interface::{BackendError, LedgerStore, Loaded, Result};
use crate::core::Ledger;

/// Holds the two text files in memory. Goes through the same line format
/// as [`TextStore`](crate::backend::TextStore).
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RefCell<String>,
    transactions: RefCell<String>,
    saves: Cell<usize>,
    read_only: Cell<bool>
}

impl MemoryStore {
    const ACCOUNTS: &'static str = "accounts";
    const TRANSACTIONS: &'static str = "transactions";

    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn with_contents(accounts: &str, transactions: &str) -> MemoryStore {
        MemoryStore {
            accounts: RefCell::new(accounts.to_owned()),
            transactions: RefCell::new(transactions.to_owned()),
            ..MemoryStore::default()
        }
    }

    pub fn accounts_text(&self) -> String {
        self.accounts.borrow().clone()
    }

    pub fn transactions_text(&self) -> String {
        self.transactions.borrow().clone()
    }

    /// Number of successful saves so far.
    #[cfg(test)]
    pub(crate) fn saves(&self) -> usize {
        self.saves.get()
    }

    /// While set, every save fails with a permission error.
    #[cfg(test)]
    pub(crate) fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Loaded> {
        Ok(codec::decode_ledger(
            Self::ACCOUNTS, &self.accounts.borrow(),
            Self::TRANSACTIONS, &self.transactions.borrow()))
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        if self.read_only.get() {
            return Err(BackendError::Io {
                path: PathBuf::from(Self::ACCOUNTS),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only")
            });
        }
        let (accounts, transactions) = codec::encode_ledger(ledger);
        *self.accounts.borrow_mut() = accounts;
        *self.transactions.borrow_mut() = transactions;
        self.saves.set(self.saves.get() + 1);
        return Ok(());
    }
}
