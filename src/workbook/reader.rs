// src/workbook/reader.rs
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use crate::utils::error::WorkbookError;
use crate::workbook::sheet::{Cell, Sheet};

/// Sheet preferred by every Wissensbilanz export; the first sheet is used otherwise.
pub const PRIMARY_SHEET_NAME: &str = "Tab";

/// An open, read-only workbook. Only cached formula results are visible.
pub struct Workbook {
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        tracing::debug!("Opening workbook {}", path.display());
        let sheets = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    pub fn read_sheet(&mut self, name: &str) -> Result<Sheet, WorkbookError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| WorkbookError::SheetRead {
                sheet: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(sheet_from_range(name, &range))
    }

    /// Reads the "Tab" sheet if present, else the first sheet.
    pub fn read_primary_sheet(&mut self) -> Result<Sheet, WorkbookError> {
        let names = self.sheet_names();
        let name = select_sheet_name(&names)
            .ok_or(WorkbookError::NoSheets)?
            .to_string();
        tracing::debug!("Using sheet '{}' (of {:?})", name, names);
        self.read_sheet(&name)
    }
}

pub fn select_sheet_name(names: &[String]) -> Option<&str> {
    names
        .iter()
        .find(|n| n.as_str() == PRIMARY_SHEET_NAME)
        .or_else(|| names.first())
        .map(String::as_str)
}

/// calamine ranges begin at the first used cell; pad the offset so the grid
/// is addressed by absolute sheet coordinates.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = Vec::with_capacity(col_offset + row.len());
        cells.resize(col_offset, Cell::Empty);
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }

    Sheet::new(name, rows)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_select_prefers_tab() {
        let names = vec!["Info".to_string(), "Tab".to_string()];
        assert_eq!(select_sheet_name(&names), Some("Tab"));
    }

    #[test]
    fn test_select_falls_back_to_first() {
        let names = vec!["Daten".to_string(), "Info".to_string()];
        assert_eq!(select_sheet_name(&names), Some("Daten"));
        assert_eq!(select_sheet_name(&[]), None);
    }

    #[test]
    fn test_range_offset_is_padded() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("Codex".to_string()));
        range.set_value((3, 2), Data::Float(5.0));

        let sheet = sheet_from_range("Tab", &range);
        assert_eq!(sheet.cell(2, 1), &Cell::from("Codex"));
        assert_eq!(sheet.cell(3, 2), &Cell::Number(5.0));
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.height(), 4);
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(convert_cell(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(convert_cell(&Data::Bool(true)), Cell::Number(1.0));
        assert_eq!(convert_cell(&Data::Empty), Cell::Empty);
        assert!(matches!(convert_cell(&Data::Error(CellErrorType::Div0)), Cell::Text(_)));
    }

    #[test]
    fn test_reads_tab_sheet_from_real_workbook() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fixture.xlsx");

        let mut xlsx = rust_xlsxwriter::Workbook::new();
        xlsx.add_worksheet().set_name("Info").unwrap().write_string(0, 0, "Hinweise").unwrap();
        let tab = xlsx.add_worksheet().set_name("Tab").unwrap();
        tab.write_string(2, 1, "Codex").unwrap();
        tab.write_number(3, 2, 42.0).unwrap();
        tab.write_boolean(3, 3, true).unwrap();
        xlsx.save(&path).unwrap();

        let mut workbook = Workbook::open(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Info".to_string(), "Tab".to_string()]);

        let sheet = workbook.read_primary_sheet().unwrap();
        assert_eq!(sheet.name(), "Tab");
        assert_eq!(sheet.cell(2, 1), &Cell::from("Codex"));
        assert_eq!(sheet.cell(3, 2), &Cell::Number(42.0));
        assert_eq!(sheet.cell(3, 3), &Cell::Number(1.0));
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = Workbook::open(Path::new("does/not/exist.xlsx"));
        assert!(matches!(result, Err(WorkbookError::Open { .. })));
    }
}
