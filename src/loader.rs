//! Invoice record loading. One JSON document per invoice file; parsing is
//! permissive about field types but strict about well-formed JSON; an
//! unreadable file is an error the pipeline boundary folds into a failure
//! outcome.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::InvoiceRecord;
use crate::error::Result;

pub fn load_invoice(path: &Path) -> Result<InvoiceRecord> {
    let raw = fs::read_to_string(path)?;
    let record: InvoiceRecord = serde_json::from_str(&raw)?;
    Ok(record)
}

/// All invoice files in a corpus directory, sorted for a stable run order.
pub fn list_invoices(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// File name of an invoice source, for log markers and fallback identifiers.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
