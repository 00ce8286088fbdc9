// src/extractors/header.rs
use crate::extractors::year::extract_year;
use crate::kennzahl::registry;
use crate::workbook::{Cell, Sheet};

/// Rows scanned for a header unless configured otherwise.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 30;
/// A header row needs at least this many distinct valid years.
pub const MIN_HEADER_YEARS: usize = 2;
/// Label of the institution-code column.
pub const CODE_COLUMN_LABEL: &str = "Codex";
/// Column B, used when no header cell carries the label.
pub const DEFAULT_CODE_COLUMN: usize = 1;

/// Year → column index for one sheet.
/// Keeps first-seen order of years; a repeated year takes the later column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<(i32, usize)>,
}

impl HeaderMap {
    pub fn insert(&mut self, year: i32, col: usize) {
        match self.columns.iter_mut().find(|(y, _)| *y == year) {
            Some(entry) => entry.1 = col,
            None => self.columns.push((year, col)),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.columns.iter().copied()
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.columns.iter().map(|(y, _)| *y).collect();
        years.sort_unstable();
        years
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: usize, // 0-based
    pub years: HeaderMap,
}

/// Finds the first row within `scan_limit` rows holding at least two valid year labels.
pub fn locate_header(sheet: &Sheet, scan_limit: usize) -> Option<HeaderLocation> {
    sheet.rows_in(0, scan_limit).find_map(|(row, cells)| {
        let years = valid_year_columns(cells);
        tracing::trace!("Row {}: {} year label(s)", row + 1, years.len());
        (years.len() >= MIN_HEADER_YEARS).then_some(HeaderLocation { row, years })
    })
}

fn valid_year_columns(cells: &[Cell]) -> HeaderMap {
    let mut years = HeaderMap::default();
    for (col, cell) in cells.iter().enumerate() {
        let year = cell.text().and_then(|t| extract_year(&t));
        if let Some(year) = year.filter(|y| registry::is_valid_year(*y)) {
            years.insert(year, col);
        }
    }
    years
}

/// Where the institution codes live, and whether that was found or assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeColumn {
    Labelled(usize),
    Fallback(usize),
}

impl CodeColumn {
    pub fn index(self) -> usize {
        match self {
            CodeColumn::Labelled(col) | CodeColumn::Fallback(col) => col,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, CodeColumn::Fallback(_))
    }
}

pub fn locate_code_column(sheet: &Sheet, header_row: usize) -> CodeColumn {
    sheet
        .row(header_row)
        .iter()
        .position(|cell| cell.text().is_some_and(|t| t.contains(CODE_COLUMN_LABEL)))
        .map(CodeColumn::Labelled)
        .unwrap_or(CodeColumn::Fallback(DEFAULT_CODE_COLUMN))
}
