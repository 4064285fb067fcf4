//! Filtered re-export of the import file, keeping only unique records.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ReconError;
use crate::model::{ProductRecord, ReconOutcome};
use crate::source::{InputFormat, RecordSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub original_count: usize,
    pub filtered_count: usize,
    pub removed: usize,
}

impl FilterStats {
    pub fn from_outcome(outcome: &ReconOutcome) -> Self {
        Self {
            original_count: outcome.summary.total_import_products,
            filtered_count: outcome.unique_imports.len(),
            removed: outcome.summary.removed(),
        }
    }
}

#[derive(Serialize)]
struct FilteredJson<'a> {
    filtered_date: String,
    original_count: usize,
    filtered_count: usize,
    removed_duplicates: usize,
    products: Vec<&'a ProductRecord>,
}

/// Serialize the unique imports in the layout of the original file.
///
/// JSON gets a metadata wrapper with a `products` array; CSV keeps the
/// original header row and column order.
pub fn render_filtered(
    source: &RecordSet,
    outcome: &ReconOutcome,
    filtered_date: NaiveDate,
) -> Result<String, ReconError> {
    let stats = FilterStats::from_outcome(outcome);
    let products: Vec<&ProductRecord> =
        outcome.unique_imports.iter().map(|c| &c.import_record).collect();

    match source.format {
        InputFormat::Json => {
            let doc = FilteredJson {
                filtered_date: filtered_date.format("%Y-%m-%d").to_string(),
                original_count: stats.original_count,
                filtered_count: stats.filtered_count,
                removed_duplicates: stats.removed,
                products,
            };
            let mut text = serde_json::to_string_pretty(&doc)
                .map_err(|e| ReconError::data_format(InputFormat::Json, e.to_string()))?;
            text.push('\n');
            Ok(text)
        }
        InputFormat::Csv => write_csv(&source.headers, &products),
    }
}

fn write_csv(headers: &[String], products: &[&ProductRecord]) -> Result<String, ReconError> {
    let csv_err = |e: csv::Error| ReconError::data_format(InputFormat::Csv, e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers).map_err(csv_err)?;
    for product in products {
        let row = headers.iter().map(|h| match product.get(h) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        });
        writer.write_record(row).map_err(csv_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ReconError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReconError::data_format(InputFormat::Csv, e.to_string()))
}

/// `<stem>_filtered.<ext>` next to the import file.
pub fn default_filtered_path(import_path: &Path, format: InputFormat) -> PathBuf {
    let stem = import_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import".to_string());
    let ext = import_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| format.extension().to_string());
    import_path.with_file_name(format!("{stem}_filtered.{ext}"))
}
