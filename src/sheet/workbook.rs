//! Implements the `Codec` trait for `.xlsx` workbooks. Reading uses `calamine` and writing uses
//! `rust_xlsxwriter`.

use crate::error::Res;
use crate::sheet::{Cell, Codec, Format, Grid};
use anyhow::Context;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use tracing::trace;

/// Workbook numbers are `f64`. Larger integers are written as text so they are not rounded.
const MAX_EXACT_FLOAT: i64 = 1 << 53;

#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxCodec;

impl Codec for XlsxCodec {
    fn encode(&self, sheet_name: &str, rows: &[Vec<Cell>]) -> Res<Vec<u8>> {
        trace!("encoding {} rows into sheet {sheet_name}", rows.len());
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .with_context(|| format!("Invalid sheet name '{sheet_name}'"))?;

        for (row_ix, row) in rows.iter().enumerate() {
            let r = u32::try_from(row_ix).context("Too many rows for a worksheet")?;
            for (col_ix, cell) in row.iter().enumerate() {
                let c = u16::try_from(col_ix).context("Too many columns for a worksheet")?;
                match cell {
                    Cell::Empty => continue,
                    Cell::Text(s) => worksheet.write_string(r, c, s.as_str()),
                    Cell::Number(n) if n.abs() > Decimal::from(MAX_EXACT_FLOAT) => {
                        worksheet.write_string(r, c, n.to_string())
                    }
                    Cell::Number(n) => worksheet.write_number(r, c, n.to_f64().unwrap_or_default()),
                    Cell::Date(_) => worksheet.write_string(r, c, cell.to_string()),
                }
                .with_context(|| format!("Unable to write cell at row {r}, column {c}"))?;
            }
        }

        workbook
            .save_to_buffer()
            .context("Unable to serialize the workbook")
    }

    fn decode(&self, bytes: &[u8]) -> Res<Grid> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))
            .context("The file is not a readable xlsx workbook")?;
        let range = workbook
            .worksheet_range_at(0)
            .context("The workbook does not contain any sheets")?
            .context("Unable to read the first sheet of the workbook")?;
        trace!("decoded first sheet with dimensions {:?}", range.get_size());
        Ok(range
            .rows()
            .map(|row| row.iter().map(to_cell).collect())
            .collect())
    }

    fn format(&self) -> Format {
        Format::Xlsx
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Float(f) => Decimal::from_f64(*f).map(Cell::Number).unwrap_or_default(),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::Date).unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}
