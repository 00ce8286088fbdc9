// src/workbook/sheet.rs
use std::borrow::Cow;

static EMPTY_CELL: Cell = Cell::Empty;

/// A single pre-evaluated cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// True for absent cells and empty strings.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Textual rendering of the cell, `None` when absent.
    /// Integral numbers render without a fractional part ("2021", not "2021.0").
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(Cow::Owned(format!("{}", *n as i64)))
            }
            Cell::Number(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Text rendering with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> Option<String> {
        self.text().map(|t| t.trim().to_string())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Read-only grid view of one worksheet, addressed by absolute 0-based (row, column).
/// Rows may be ragged; anything outside the stored cells reads as `Cell::Empty`.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { name: name.into(), rows }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of stored rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.row(row).get(col).unwrap_or(&EMPTY_CELL)
    }

    /// Rows `start..end` (clamped to the sheet) paired with their index.
    pub fn rows_in(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, &[Cell])> + '_ {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        self.rows[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, row)| (start + offset, row.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reads_as_empty() {
        let sheet = Sheet::new("Tab", vec![vec![Cell::from("a")], vec![]]);
        assert_eq!(sheet.cell(0, 0), &Cell::from("a"));
        assert_eq!(sheet.cell(0, 5), &Cell::Empty);
        assert_eq!(sheet.cell(9, 0), &Cell::Empty);
        assert!(sheet.row(42).is_empty());
    }

    #[test]
    fn test_number_text_rendering() {
        assert_eq!(Cell::Number(2021.0).text().as_deref(), Some("2021"));
        assert_eq!(Cell::Number(1.5).text().as_deref(), Some("1.5"));
        assert_eq!(Cell::Empty.text(), None);
        assert_eq!(Cell::from("  UA ").trimmed_text().as_deref(), Some("UA"));
    }

    #[test]
    fn test_blank_cells() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("").is_blank());
        assert!(!Cell::from(" ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_rows_in_is_clamped() {
        let sheet = Sheet::new("Tab", vec![vec![], vec![Cell::from("x")], vec![]]);
        let indices: Vec<usize> = sheet.rows_in(1, 100).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(sheet.rows_in(10, 20).count(), 0);
    }
}
