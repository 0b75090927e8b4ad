//! Maps ledger entries to and from the flat rows of the `DataKeuangan` sheet.
//!
//! The `Bridge` is given its `Codec` when it is constructed. Choosing a codec is therefore the only
//! place where "this file type is not supported" can happen; once a `Bridge` exists, export and
//! import only fail for the reasons listed on each method.

use crate::display::DateFormat;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Entry, EntryKind, Ledger};
use crate::sheet::{Cell, Codec, Format, Record};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// The outcome of an import.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportSummary {
    /// Rows that became ledger entries.
    pub imported: usize,
    /// Rows whose type was neither income nor outcome.
    pub skipped: usize,
}

pub struct Bridge {
    codec: Box<dyn Codec>,
    sheet_name: String,
    date_format: DateFormat,
}

impl Bridge {
    pub fn new(codec: Box<dyn Codec>, sheet_name: impl Into<String>, date_format: DateFormat) -> Self {
        Self {
            codec,
            sheet_name: sheet_name.into(),
            date_format,
        }
    }

    /// Creates a `Bridge` whose codec matches the extension of `path`, using the sheet name and
    /// date format from `config`.
    ///
    /// # Errors
    /// - `ErrorType::CodecUnavailable` if there is no codec for the file extension.
    pub fn for_path(path: &Path, config: &Config) -> Result<Self> {
        let format = Format::from_path(path)?;
        Ok(Self::new(
            format.codec(),
            config.sheet_name(),
            config.date_format(),
        ))
    }

    pub fn format(&self) -> Format {
        self.codec.format()
    }

    /// One record per entry: incomes first, then outcomes, each in ledger order.
    ///
    /// # Errors
    /// - `ErrorType::EmptyExport` if the ledger has no entries.
    pub fn export_records(&self, ledger: &Ledger) -> Result<Vec<Record>> {
        if ledger.is_empty() {
            return Err(Error::msg(
                ErrorType::EmptyExport,
                "There is no data to export",
            ));
        }
        Ok(ledger.entries().map(|e| self.to_record(e)).collect())
    }

    /// Encodes the ledger into file bytes with a header row followed by one row per entry.
    ///
    /// # Errors
    /// - `ErrorType::EmptyExport` if the ledger has no entries.
    /// - `ErrorType::Io` if the codec fails to produce the file.
    pub fn export(&self, ledger: &Ledger) -> Result<Vec<u8>> {
        let records = self.export_records(ledger)?;
        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(Record::header_row());
        rows.extend(records.iter().map(Record::to_row));
        debug!(
            "Exporting {} entries as {}",
            records.len(),
            self.codec.format()
        );
        self.codec
            .encode(&self.sheet_name, &rows)
            .with_context(|| format!("Unable to create the {} file", self.codec.format()))
            .pub_result(ErrorType::Io)
    }

    /// Decodes file bytes into records without touching any ledger.
    ///
    /// # Errors
    /// - `ErrorType::DecodeFailure` if the bytes cannot be decoded, or if the first sheet holds no
    ///   data rows.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<Record>> {
        let grid = self
            .codec
            .decode(bytes)
            .context("Unable to read the spreadsheet file, make sure the format is correct")
            .pub_result(ErrorType::DecodeFailure)?;
        let records = Record::parse_grid(grid)
            .context("The spreadsheet does not contain valid data")
            .pub_result(ErrorType::DecodeFailure)?;
        if records.is_empty() {
            return Err(Error::msg(
                ErrorType::DecodeFailure,
                "The spreadsheet does not contain valid data",
            ));
        }
        Ok(records)
    }

    /// Replaces the contents of `ledger` with `records`. Records with an unrecognized or missing
    /// type are skipped.
    pub fn import_records(
        &self,
        ledger: &mut Ledger,
        records: impl IntoIterator<Item = Record>,
    ) -> ImportSummary {
        ledger.clear_all();
        let mut summary = ImportSummary::default();
        for (ix, record) in records.into_iter().enumerate() {
            match self.to_entry(&record) {
                Some(entry) => {
                    ledger.add(entry);
                    summary.imported += 1;
                }
                None => {
                    trace!("Skipping row {} with type {:?}", ix + 2, record.kind());
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    /// Decodes `bytes` and, only if that succeeds, replaces the contents of `ledger`.
    ///
    /// # Errors
    /// - `ErrorType::DecodeFailure`, in which case `ledger` is unchanged.
    pub fn import(&self, ledger: &mut Ledger, bytes: &[u8]) -> Result<ImportSummary> {
        let records = self.decode(bytes)?;
        Ok(self.import_records(ledger, records))
    }

    fn to_record(&self, entry: &Entry) -> Record {
        Record {
            kind: Some(entry.kind().to_string()),
            category: Some(entry.category().to_string()),
            amount: Some(Cell::from(entry.amount().value())),
            description: Some(entry.description().to_string()),
            date: Some(Cell::Text(self.date_format.format(entry.date()))),
            other_fields: Default::default(),
        }
    }

    fn to_entry(&self, record: &Record) -> Option<Entry> {
        let kind = record.kind().and_then(EntryKind::from_cell)?;
        let amount = record.amount().map(amount_from_cell).unwrap_or_default();
        let date = record
            .date()
            .and_then(|cell| self.date_from_cell(cell))
            .unwrap_or_else(|| Local::now().naive_local());
        Some(
            Entry::new(kind, record.category().unwrap_or_default(), amount)
                .with_description(record.description().unwrap_or_default())
                .with_date(date),
        )
    }

    fn date_from_cell(&self, cell: &Cell) -> Option<NaiveDateTime> {
        match cell {
            Cell::Empty => None,
            Cell::Date(date) => Some(*date),
            Cell::Text(s) => self.date_format.parse(s),
            Cell::Number(serial) => DateFormat::from_serial(*serial),
        }
    }
}

/// Anything that is not a non-negative number becomes zero.
fn amount_from_cell(cell: &Cell) -> Amount {
    match cell {
        Cell::Number(n) => Amount::from_decimal(*n).unwrap_or_default(),
        Cell::Text(s) => Amount::from_str(s).unwrap_or_default(),
        Cell::Empty | Cell::Date(_) => Amount::ZERO,
    }
}
