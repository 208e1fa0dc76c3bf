// ScopeTrace - app/runner.rs
//
// File-level orchestration for the CLI: open a data file, run the core
// parser over it, and write exports. Per-file diagnostics are routed to
// structured logging here; the caller decides how to present them.

use crate::core::export;
use crate::core::model::Dataset;
use crate::core::options::ParseOptions;
use crate::core::parser::{self, ParseResult};
use crate::util::error::{Result, ScopeTraceError};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse one data file from disk.
///
/// Fatal parse conditions and I/O failures surface as errors; recoverable
/// anomalies ride along in the returned result and are additionally logged
/// at warn level so unattended runs leave a trace.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParseResult> {
    let file = File::open(path).map_err(|e| ScopeTraceError::Io {
        path: path.to_path_buf(),
        operation: "open",
        source: e,
    })?;

    let result = parser::parse_reader(BufReader::new(file), options)?;

    for diagnostic in &result.diagnostics {
        tracing::warn!(file = %path.display(), "{diagnostic}");
    }
    tracing::info!(
        file = %path.display(),
        rows = result.dataset.row_count(),
        series = result.dataset.series_count(),
        diagnostics = result.diagnostics.len(),
        "Data file ingested"
    );

    Ok(result)
}

/// Write a dataset to a CSV file. Returns the number of records written.
pub fn export_csv_file(dataset: &Dataset, path: &Path) -> Result<usize> {
    let path_buf = path.to_path_buf();
    let file = File::create(path).map_err(|e| ScopeTraceError::Io {
        path: path_buf.clone(),
        operation: "create",
        source: e,
    })?;
    let count = export::export_csv(dataset, file, &path_buf)?;
    tracing::info!(file = %path.display(), records = count, "CSV export written");
    Ok(count)
}

/// Write a dataset to a JSON file. Returns the number of data rows.
pub fn export_json_file(dataset: &Dataset, path: &Path) -> Result<usize> {
    let path_buf = path.to_path_buf();
    let file = File::create(path).map_err(|e| ScopeTraceError::Io {
        path: path_buf.clone(),
        operation: "create",
        source: e,
    })?;
    let count = export::export_json(dataset, file, &path_buf)?;
    tracing::info!(file = %path.display(), rows = count, "JSON export written");
    Ok(count)
}
