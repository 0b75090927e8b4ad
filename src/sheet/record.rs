use crate::error::Res;
use crate::sheet::{Cell, Grid};
use anyhow::Context;
use std::collections::{BTreeMap, HashMap};

/// A single row of the `DataKeuangan` sheet. Every field is optional because an imported file may
/// be missing any of the columns, or leave any cell blank.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Record {
    pub(crate) kind: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) amount: Option<Cell>,
    pub(crate) description: Option<String>,
    pub(crate) date: Option<Cell>,
    /// Cells under headers that are not part of the schema.
    pub(crate) other_fields: BTreeMap<String, Cell>,
}

impl Record {
    /// Parses a grid whose first row holds the headers. Rows in which every cell is empty are
    /// skipped. A header that repeats gets a numbered suffix (`Keterangan_1`) and cells without a
    /// header are keyed `__EMPTY`, `__EMPTY_1` and so on; both end up in `other_fields`.
    ///
    /// # Errors
    /// - The grid has no header row.
    pub fn parse_grid(grid: Grid) -> Res<Vec<Record>> {
        let width = grid.iter().map(Vec::len).max().unwrap_or_default();
        let mut rows = grid.into_iter();
        let header_row = rows
            .next()
            .context("An empty sheet cannot be parsed into records")?;
        let headers = header_keys(&header_row, width);

        Ok(rows
            .filter(|values| !values.iter().all(Cell::is_empty))
            .map(|values| Record::new_with_headers(&headers, values))
            .collect())
    }

    /// Builds a record by matching each value to the header at the same position.
    pub fn new_with_headers<S, I>(headers: &[S], values: I) -> Self
    where
        S: AsRef<str>,
        I: IntoIterator<Item = Cell>,
    {
        let mut record = Record::default();
        for (ix, value) in values.into_iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            match headers.get(ix) {
                Some(header) => record.set_with_header(header.as_ref(), value),
                None => record.set_with_header(&format!("{EMPTY_HEADER}_{ix}"), value),
            }
        }
        record
    }

    pub fn set_with_header(&mut self, header: &str, value: Cell) {
        match Column::from_header(header) {
            Some(Column::Type) => self.kind = value.text(),
            Some(Column::Category) => self.category = value.text(),
            Some(Column::Amount) => self.amount = Some(value),
            Some(Column::Description) => self.description = value.text(),
            Some(Column::Date) => self.date = Some(value),
            None => {
                let _ = self.other_fields.insert(header.to_string(), value);
            }
        }
    }

    /// The header row written on export.
    pub fn header_row() -> Vec<Cell> {
        Column::ALL
            .iter()
            .map(|c| Cell::from(c.as_header_str()))
            .collect()
    }

    /// The cells of this record in `Column::ALL` order. Missing fields are written as empty cells.
    pub fn to_row(&self) -> Vec<Cell> {
        let text = |s: &Option<String>| s.clone().map(Cell::Text).unwrap_or_default();
        vec![
            text(&self.kind),
            text(&self.category),
            self.amount.clone().unwrap_or_default(),
            text(&self.description),
            self.date.clone().unwrap_or_default(),
        ]
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn amount(&self) -> Option<&Cell> {
        self.amount.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn date(&self) -> Option<&Cell> {
        self.date.as_ref()
    }
}

/// The columns of the `DataKeuangan` sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Column {
    Type,
    Category,
    Amount,
    Description,
    Date,
}

impl Column {
    /// All columns in the order they are written.
    pub const ALL: [Column; 5] = [
        Column::Type,
        Column::Category,
        Column::Amount,
        Column::Description,
        Column::Date,
    ];

    /// Header matching is exact.
    pub fn from_header(header: impl AsRef<str>) -> Option<Column> {
        match header.as_ref() {
            TYPE_STR => Some(Column::Type),
            CATEGORY_STR => Some(Column::Category),
            AMOUNT_STR => Some(Column::Amount),
            DESCRIPTION_STR => Some(Column::Description),
            DATE_STR => Some(Column::Date),
            _ => None,
        }
    }

    pub fn as_header_str(&self) -> &'static str {
        match self {
            Column::Type => TYPE_STR,
            Column::Category => CATEGORY_STR,
            Column::Amount => AMOUNT_STR,
            Column::Description => DESCRIPTION_STR,
            Column::Date => DATE_STR,
        }
    }
}

pub(super) const TYPE_STR: &str = "Tipe";
pub(super) const CATEGORY_STR: &str = "Kategori";
pub(super) const AMOUNT_STR: &str = "Jumlah";
pub(super) const DESCRIPTION_STR: &str = "Keterangan";
pub(super) const DATE_STR: &str = "Tanggal";

/// The key for cells whose column has no header.
const EMPTY_HEADER: &str = "__EMPTY";

/// One unique key per column up to `width`. The first occurrence of a header keeps its name.
fn header_keys(header_row: &[Cell], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..width.max(header_row.len()))
        .map(|ix| {
            let base = header_row
                .get(ix)
                .and_then(Cell::text)
                .unwrap_or_else(|| EMPTY_HEADER.to_string());
            let count = seen.entry(base.clone()).or_default();
            let key = if *count == 0 {
                base
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            key
        })
        .collect()
}
