use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A sandbox account staged between maintenance runs, keyed by email in the
/// store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub email: String,
    #[serde(default)]
    pub ach_id: Option<String>,
}

/// A funding transfer staged by the balance check and submitted later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub account_id: String,
    pub email: String,
    pub ach_id: String,
    pub amount: String,
    pub requested_at: DateTime<Utc>,
}

/// Flat-file JSON store shared by the maintenance binaries.
///
/// Records are a map keyed by account email; a BTreeMap keeps the file diffs
/// stable across runs.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records; a missing file is an error.
    pub fn load<T: DeserializeOwned>(&self) -> Result<BTreeMap<String, T>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    /// Load all records, treating a missing file as an empty store.
    pub fn load_or_default<T: DeserializeOwned>(&self) -> Result<BTreeMap<String, T>> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(BTreeMap::new())
        }
    }

    pub fn save<T: Serialize>(&self, records: &BTreeMap<String, T>) -> Result<()> {
        let contents = serde_json::to_string_pretty(records)
            .context("Failed to serialize staging records")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "saved staging file");

        Ok(())
    }
}
