use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::backend::codec;
use crate::backend::interface::{BackendError, LedgerStore, Loaded, Result};
use crate::core::Ledger;

/// Keeps the ledger as two text files in one directory.
#[derive(Debug, Clone)]
pub struct TextStore {
    dir: PathBuf
}

impl TextStore {
    pub const ACCOUNTS_FILE: &'static str = "accounts.txt";
    pub const TRANSACTIONS_FILE: &'static str = "transactions.txt";

    pub fn new(dir: impl AsRef<Path>) -> TextStore {
        TextStore { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.dir.join(Self::ACCOUNTS_FILE)
    }

    pub fn transactions_path(&self) -> PathBuf {
        self.dir.join(Self::TRANSACTIONS_FILE)
    }

    fn io_error(path: &Path) -> impl FnOnce(io::Error) -> BackendError + '_ {
        move |source| BackendError::Io { path: path.to_path_buf(), source }
    }

    /// Reads `path`, creating it empty first when absent.
    fn read_or_create(path: &Path) -> Result<String> {
        if !path.exists() {
            debug!("creating empty {}", path.display());
            fs::write(path, "").map_err(Self::io_error(path))?;
        }
        fs::read_to_string(path).map_err(Self::io_error(path))
    }

    /// Writes a sibling temp file and renames it over `path`, so readers
    /// only ever see the old or the new contents.
    fn replace(path: &Path, contents: &str) -> Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, contents).map_err(Self::io_error(&tmp))?;
        fs::rename(&tmp, path).map_err(Self::io_error(path))
    }
}

impl LedgerStore for TextStore {
    fn load(&self) -> Result<Loaded> {
        fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;

        let accounts = Self::read_or_create(&self.accounts_path())?;
        let transactions = Self::read_or_create(&self.transactions_path())?;
        let loaded = codec::decode_ledger(
            Self::ACCOUNTS_FILE, &accounts,
            Self::TRANSACTIONS_FILE, &transactions);

        debug!("loaded {} accounts and {} transactions from {}",
            loaded.ledger.accounts().len(), loaded.ledger.history().len(), self.dir.display());
        return Ok(loaded);
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;

        let (accounts, transactions) = codec::encode_ledger(ledger);
        Self::replace(&self.accounts_path(), &accounts)?;
        Self::replace(&self.transactions_path(), &transactions)?;

        debug!("saved {} accounts and {} transactions to {}",
            ledger.accounts().len(), ledger.history().len(), self.dir.display());
        return Ok(());
    }
}
