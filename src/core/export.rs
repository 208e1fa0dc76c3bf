// ScopeTrace - core/export.rs
//
// CSV and JSON export of an ingested dataset.
// Core layer: writes to any Write trait object; paths appear in errors only.

use crate::core::model::Dataset;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::PathBuf;

/// Export a dataset to CSV.
///
/// Header row: axis label followed by the series labels. One record per
/// accepted data row, values in canonical dot-decimal notation. Color and
/// note metadata is not part of the tabular surface; use JSON for a full
/// round-trip.
///
/// Returns the number of data records written.
pub fn export_csv<W: Write>(
    dataset: &Dataset,
    writer: W,
    export_path: &PathBuf,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(1 + dataset.series_count());
    header.push(dataset.axis_label.clone());
    header.extend(dataset.series_labels.iter().cloned());
    csv_writer
        .write_record(&header)
        .map_err(|e| ExportError::Csv {
            path: export_path.clone(),
            source: e,
        })?;

    let mut count = 0;
    for row in 0..dataset.row_count() {
        let mut record = Vec::with_capacity(1 + dataset.series_count());
        record.push(dataset.time_values[row].to_string());
        for series in &dataset.series_values {
            record.push(series[row].to_string());
        }
        csv_writer
            .write_record(&record)
            .map_err(|e| ExportError::Csv {
                path: export_path.clone(),
                source: e,
            })?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.clone(),
        source: e,
    })?;

    Ok(count)
}

/// Export a dataset to JSON (single object, pretty-printed), including
/// color and note metadata.
pub fn export_json<W: Write>(
    dataset: &Dataset,
    writer: W,
    export_path: &PathBuf,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, dataset).map_err(|e| ExportError::Json {
        path: export_path.clone(),
        source: e,
    })?;
    Ok(dataset.row_count())
}
