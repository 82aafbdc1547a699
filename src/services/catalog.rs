use crate::models::{HospitalRecord, HospitalRow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading the hospital catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only hospital catalog shared by every request
///
/// Loaded once at startup; cloning only bumps a reference count.
#[derive(Debug, Clone, Default)]
pub struct HospitalCatalog {
    hospitals: Arc<Vec<HospitalRecord>>,
}

impl HospitalCatalog {
    pub fn new(hospitals: Vec<HospitalRecord>) -> Self {
        Self {
            hospitals: Arc::new(hospitals),
        }
    }

    /// Load the catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = Self::from_json(&raw)?;
        tracing::info!("Loaded {} hospitals from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a JSON array of raw hospital rows, applying field defaults
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let rows: Vec<HospitalRow> = serde_json::from_str(raw)?;
        Ok(Self::new(rows.into_iter().map(HospitalRecord::from).collect()))
    }

    pub fn hospitals(&self) -> &[HospitalRecord] {
        &self.hospitals
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }
}
