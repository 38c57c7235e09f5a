//! Loading records, report definitions, and field catalogs from JSON files.

use std::fs;
use std::path::{Path, PathBuf};

use reportgrid_core::FieldCatalog;
use reportgrid_proto::{Record, ReportConfig};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Errors loading an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON array of flat records.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let records: Vec<Record> = load_json(path)?;
    debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

/// Load a saved report definition.
pub fn load_report(path: &Path) -> Result<ReportConfig, LoadError> {
    let report: ReportConfig = load_json(path)?;
    debug!(path = %path.display(), report = %report.id, "Loaded report");
    Ok(report)
}

/// Load a field catalog from a JSON array of field descriptors.
pub fn load_catalog(path: &Path) -> Result<FieldCatalog, LoadError> {
    let fields = load_json(path)?;
    Ok(FieldCatalog::new(fields))
}
