//! Parsing of collector output (JSON or CSV bytes) into product records.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ReconError;
use crate::model::ProductRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Format implied by a `.json` / `.csv` file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Csv => write!(f, "CSV"),
        }
    }
}

/// Records loaded from one file, with enough layout information to write
/// a filtered copy back in the same shape.
#[derive(Debug, Clone)]
pub struct RecordSet {
    pub format: InputFormat,
    /// CSV header row; empty for JSON.
    pub headers: Vec<String>,
    pub records: Vec<ProductRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse a whole input file from its raw bytes. Any malformed content,
/// including text that is not UTF-8, fails the load; no partial record set
/// is returned.
pub fn load_records(input: impl AsRef<[u8]>, format: InputFormat) -> Result<RecordSet, ReconError> {
    match format {
        InputFormat::Json => load_json(input.as_ref()),
        InputFormat::Csv => load_csv(input.as_ref()),
    }
}

fn load_json(bytes: &[u8]) -> Result<RecordSet, ReconError> {
    let format = InputFormat::Json;
    let root: Value =
        serde_json::from_slice(bytes).map_err(|e| ReconError::data_format(format, e.to_string()))?;

    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ReconError::data_format(format, "'products' must be an array"));
            }
            None => {
                return Err(ReconError::data_format(
                    format,
                    "expected an array or an object with a 'products' array",
                ));
            }
        },
        _ => {
            return Err(ReconError::data_format(
                format,
                "expected an array or an object with a 'products' array",
            ));
        }
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(ProductRecord::new(map)),
            _ => Err(ReconError::data_format(
                format,
                format!("product {i} is not an object"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordSet {
        format,
        headers: Vec::new(),
        records,
    })
}

fn load_csv(bytes: &[u8]) -> Result<RecordSet, ReconError> {
    let format = InputFormat::Csv;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::data_format(format, e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Rows are keyed by header, so a repeated column would collapse.
    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(ReconError::data_format(
                format,
                format!("duplicate column header '{header}'"),
            ));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ReconError::data_format(format, e.to_string()))?;
        let mut fields = Map::new();
        for (h, val) in headers.iter().zip(row.iter()) {
            fields.insert(h.clone(), Value::String(val.to_string()));
        }
        records.push(ProductRecord::new(fields));
    }

    Ok(RecordSet {
        format,
        headers,
        records,
    })
}
