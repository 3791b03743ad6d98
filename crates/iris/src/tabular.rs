//! Tabular data model and CSV ingestion.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Parsed CSV content: a header row plus positionally aligned data rows.
///
/// Every row holds exactly one value per header column; the ingestion
/// functions pad short records with empty strings and drop trailing extras.
/// A value is never absent, only empty. Replaced wholesale by each upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularData {
  pub headers: Vec<String>,
  pub rows: Vec<Vec<String>>,
}

impl TabularData {
  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn column_count(&self) -> usize {
    self.headers.len()
  }
}

#[derive(Error, Debug)]
pub enum ParseError {
  #[error("Failed to read CSV source: {message}")]
  Unreadable { message: String },

  #[error("CSV parsing error at line {line}: {message}")]
  Malformed { line: u64, message: String },

  #[error("CSV parsing error: {message}")]
  Syntax { message: String },
}

impl From<csv::Error> for ParseError {
  fn from(err: csv::Error) -> Self {
    if let csv::ErrorKind::Io(io_err) = err.kind() {
      return ParseError::Unreadable { message: io_err.to_string() };
    }

    match err.position() {
      Some(position) => {
        ParseError::Malformed { line: position.line(), message: err.to_string() }
      }
      None => ParseError::Syntax { message: err.to_string() },
    }
  }
}

/// Parse a CSV byte source with a header row into [`TabularData`].
///
/// The source is consumed, not retained. Fields map positionally onto the
/// header columns: short records are padded with empty strings, fields
/// beyond the header width are dropped.
pub fn read_csv<R: Read>(reader: R) -> Result<TabularData, ParseError> {
  let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

  let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();

  let mut rows = Vec::new();
  for record in csv_reader.records() {
    let record = record?;
    let mut row: Vec<String> =
      record.iter().take(headers.len()).map(|field| field.to_string()).collect();
    row.resize(headers.len(), String::new());
    rows.push(row);
  }

  Ok(TabularData { headers, rows })
}

/// Parse a CSV file from disk.
pub fn read_csv_path(path: &Path) -> Result<TabularData, ParseError> {
  let file = File::open(path).map_err(|e| ParseError::Unreadable { message: e.to_string() })?;
  read_csv(file)
}
