//! Implements the `Codec` trait for comma-separated files. A CSV file has no sheets, so the sheet
//! name is ignored on encode and the whole file is the "first sheet" on decode.

use crate::error::Res;
use crate::sheet::{Cell, Codec, Format, Grid};
use anyhow::Context;
use std::io::Cursor;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvCodec;

impl Codec for CsvCodec {
    fn encode(&self, _sheet_name: &str, rows: &[Vec<Cell>]) -> Res<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in rows {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .context("Unable to write CSV record")?;
        }
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Unable to finish writing CSV data: {}", e.error()))
    }

    fn decode(&self, bytes: &[u8]) -> Res<Grid> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false) // Headers are treated as part of the data
            .flexible(true)
            .from_reader(Cursor::new(bytes));

        let mut rows = Vec::new();
        for (ix, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Unable to read CSV line {}", ix + 1))?;
            let row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::from(field)
                    }
                })
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    fn format(&self) -> Format {
        Format::Csv
    }
}
