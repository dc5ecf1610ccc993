use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::backend::codec::MalformedRecord;
use crate::core::Ledger;

#[derive(Debug, Error)]
pub enum BackendError {
    /// A store file could not be created, read or replaced.
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// A persisted line that could not be decoded and was left out of the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub file: String,
    /// 1-based
    pub line: usize,
    pub reason: MalformedRecord
}

/// Outcome of a load that did not abort.
#[derive(Debug, Default)]
pub struct Loaded {
    pub ledger: Ledger,
    pub skipped: Vec<SkippedRecord>
}

pub trait LedgerStore {
    /// Reads the whole ledger. Malformed lines are skipped and reported;
    /// only an inaccessible store aborts the load.
    fn load(&self) -> Result<Loaded>;
    /// Replaces the persisted ledger with `ledger`.
    fn save(&self, ledger: &Ledger) -> Result<()>;
}
