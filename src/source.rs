//! Record source: reads the order CSV into raw records.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{DashboardError, Result};
use crate::models::{RawOrderRecord, SOURCE_COLUMNS};

/// Read every order from the CSV file at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_orders(path: impl AsRef<Path>) -> Result<Vec<RawOrderRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DashboardError::SourceRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let records = read_orders_from_reader(file, path)?;
    info!(rows = records.len(), "Read order source");
    Ok(records)
}

/// Read orders from any reader; `origin` is only used in error messages.
pub fn read_orders_from_reader<R: Read>(reader: R, origin: &Path) -> Result<Vec<RawOrderRecord>> {
    let source_err = |reason: String| DashboardError::SourceRead {
        path: PathBuf::from(origin),
        reason,
    };

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader.headers().map_err(|e| source_err(e.to_string()))?.clone();
    check_header(headers.iter()).map_err(source_err)?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<RawOrderRecord>().enumerate() {
        let record = row.map_err(|e| source_err(format!("row {}: {}", i + 1, e)))?;
        records.push(record);
    }

    debug!(rows = records.len(), "Decoded raw order rows");
    Ok(records)
}

/// The header must name exactly the expected column set, in any order.
fn check_header<'a>(columns: impl Iterator<Item = &'a str>) -> std::result::Result<(), String> {
    let found: BTreeSet<&str> = columns.collect();
    let expected: BTreeSet<&str> = SOURCE_COLUMNS.iter().copied().collect();

    let missing: Vec<&str> = expected.difference(&found).copied().collect();
    let unexpected: Vec<&str> = found.difference(&expected).copied().collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing columns [{}]", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        problems.push(format!("unexpected columns [{}]", unexpected.join(", ")));
    }
    Err(format!("header mismatch: {}", problems.join("; ")))
}
