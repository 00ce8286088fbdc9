// src/batch/analyze.rs
use std::path::Path;

use crate::extractors::header::locate_header;
use crate::utils::error::WorkbookError;
use crate::workbook::{Sheet, Workbook};

const SAMPLE_ROWS: usize = 20;
const SAMPLE_COLS: usize = 10;
const SAMPLE_CELL_CHARS: usize = 30;
const PRINTED_SAMPLE_ROWS: usize = 8;
const PRINTED_CELLS_PER_ROW: usize = 4;

/// Structural view of one sheet, for the dry-run report.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetAnalysis {
    pub name: String,
    pub header_row: Option<usize>, // 1-based
    pub years: Vec<i32>,
    pub sample_rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookAnalysis {
    pub file_name: String,
    pub sheets: Vec<SheetAnalysis>,
}

pub fn analyze_sheet(sheet: &Sheet, header_scan_rows: usize) -> SheetAnalysis {
    let header = locate_header(sheet, header_scan_rows);

    let sample_rows: Vec<Vec<String>> = sheet
        .rows_in(0, SAMPLE_ROWS)
        .map(|(_, cells)| {
            cells
                .iter()
                .take(SAMPLE_COLS)
                .map(|cell| {
                    cell.text()
                        .map(|t| t.chars().take(SAMPLE_CELL_CHARS).collect::<String>())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    SheetAnalysis {
        name: sheet.name().to_string(),
        header_row: header.as_ref().map(|h| h.row + 1),
        years: header.map(|h| h.years.years()).unwrap_or_default(),
        sample_rows,
    }
}

/// Reads every sheet of a workbook and reports where the header was found.
pub fn analyze_workbook(path: &Path, header_scan_rows: usize) -> Result<WorkbookAnalysis, WorkbookError> {
    let mut workbook = Workbook::open(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        match workbook.read_sheet(&name) {
            Ok(sheet) => sheets.push(analyze_sheet(&sheet, header_scan_rows)),
            Err(e) => tracing::warn!("Skipping unreadable sheet: {}", e),
        }
    }

    Ok(WorkbookAnalysis {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        sheets,
    })
}

pub fn print_analysis(analysis: &WorkbookAnalysis, verbose: bool) {
    println!("\n=== {} ===", analysis.file_name);
    for sheet in &analysis.sheets {
        println!("Sheet: {}", sheet.name);
        match sheet.header_row {
            Some(row) => println!("Header row: {}", row),
            None => println!("Header row: (none)"),
        }
        println!("Years: {:?}", sheet.years);

        if verbose {
            for (i, row) in sheet.sample_rows.iter().take(PRINTED_SAMPLE_ROWS).enumerate() {
                let non_empty: Vec<&str> = row
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !c.is_empty())
                    .take(PRINTED_CELLS_PER_ROW)
                    .collect();
                println!("  {}: {:?}", i + 1, non_empty);
            }
        }
    }
}
