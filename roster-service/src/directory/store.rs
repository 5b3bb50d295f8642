//! The immutable record collection

use std::path::Path;
use std::sync::Arc;

use super::record::Record;
use crate::error::{Error, Result};

const BUILTIN_RECORDS: &str = include_str!("../../data/users.json");

/// Read-only record collection shared by every request
///
/// Cloning is cheap; all clones share one allocation.
#[derive(Debug, Clone)]
pub struct Directory {
    records: Arc<[Record]>,
}

impl Directory {
    /// Wrap an existing set of records, keeping their order
    pub fn new(records: impl Into<Arc<[Record]>>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// The data set compiled into the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_RECORDS)
    }

    /// Parse a JSON array of records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    /// Load a JSON array of records from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map_err(|err| {
            Error::Data(format!("failed to load records from {}: {}", path.display(), err))
        })
    }

    /// The configured file when set, otherwise the built-in data set
    pub fn load(data_path: Option<&Path>) -> Result<Self> {
        let directory = match data_path {
            Some(path) => Self::from_file(path)?,
            None => Self::builtin()?,
        };
        tracing::info!(
            records = directory.len(),
            source = %data_path.map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".into()),
            "Directory loaded"
        );
        Ok(directory)
    }

    /// All records in storage order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
