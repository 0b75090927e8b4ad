//! Spreadsheet codecs. A `Codec` turns a grid of cells into file bytes and back. The ledger never
//! talks to a codec directly; see `crate::bridge::Bridge`.

mod delimited;
mod record;
mod workbook;

pub use delimited::CsvCodec;
pub use record::{Column, Record};
pub use workbook::XlsxCodec;

use crate::error::{Error, ErrorType, Res};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::Path;

/// The name of the single sheet written on export.
pub const DATA_SHEET: &str = "DataKeuangan";

/// The default filename for exported workbooks.
pub const EXPORT_FILE: &str = "perencanaan_keuangan.xlsx";

/// A single spreadsheet cell value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
    /// A native date cell, only produced by decoding formats that have them.
    Date(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell as text, or `None` if it is empty.
    pub fn text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => Display::fmt(&n.normalize(), f),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(Decimal::from(value))
    }
}

/// Rows of cells, the first row being the headers.
pub type Grid = Vec<Vec<Cell>>;

/// Encodes and decodes a single-sheet grid of cells to and from file bytes.
pub trait Codec: Send + Sync {
    /// Serializes `rows` into a workbook with one sheet named `sheet_name`.
    fn encode(&self, sheet_name: &str, rows: &[Vec<Cell>]) -> Res<Vec<u8>>;

    /// Parses `bytes` and returns the rows of the first sheet.
    fn decode(&self, bytes: &[u8]) -> Res<Grid>;

    fn format(&self) -> Format;
}

/// The spreadsheet file formats that have a `Codec`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Xlsx,
    Csv,
}

serde_plain::derive_display_from_serialize!(Format);
serde_plain::derive_fromstr_from_deserialize!(Format);

impl Format {
    /// Chooses a format by file extension.
    ///
    /// # Errors
    /// - `ErrorType::CodecUnavailable` if the extension is missing or not supported.
    pub fn from_path(path: &Path) -> crate::Result<Format> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        ext.parse::<Format>().map_err(|_| {
            Error::msg(
                ErrorType::CodecUnavailable,
                format!(
                    "No spreadsheet codec for '{}', use a .xlsx or .csv file",
                    path.display()
                ),
            )
        })
    }

    pub fn codec(self) -> Box<dyn Codec> {
        match self {
            Format::Xlsx => Box::new(XlsxCodec),
            Format::Csv => Box::new(CsvCodec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            Format::from_path(Path::new("a/b/perencanaan.xlsx")).unwrap(),
            Format::Xlsx
        );
        assert_eq!(
            Format::from_path(Path::new("DATA.CSV")).unwrap(),
            Format::Csv
        );
    }

    #[test]
    fn test_format_from_path_unsupported() {
        let err = Format::from_path(Path::new("data.ods")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::CodecUnavailable);
        let err = Format::from_path(Path::new("no_extension")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::CodecUnavailable);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(
            Cell::Number(Decimal::from_str("1500000.0").unwrap()).to_string(),
            "1500000"
        );
        assert_eq!(Cell::from("gaji").to_string(), "gaji");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::from("   ").text(), None);
        assert_eq!(Cell::from(5u64).text(), Some("5".to_string()));
    }
}
