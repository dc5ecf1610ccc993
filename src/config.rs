use std::{fs, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use crate::core::BankPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `accounts.txt` and `transactions.txt`
    pub data_dir: PathBuf
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { data_dir: PathBuf::from("data") }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub storage: StorageConfig,
    pub policy: BankPolicy
}

impl BankConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }

    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let file_content = fs::read_to_string(filepath)
            .with_context(|| format!("failed to read config file {}", filepath.display()))?;
        return Self::parse(&file_content);
    }

    /// Like [`BankConfig::read`], but a missing file means defaults.
    pub fn read_or_default(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        if filepath.as_ref().exists() {
            Self::read(filepath)
        } else {
            Ok(Self::default())
        }
    }
}
