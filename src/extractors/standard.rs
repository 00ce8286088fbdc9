// src/extractors/standard.rs
use crate::extractors::header::{locate_code_column, locate_header};
use crate::extractors::values::normalize_value;
use crate::extractors::{admit, finish, LayoutExtractor};
use crate::kennzahl::{registry, DataPoint, Extraction};
use crate::utils::error::ExtractError;
use crate::workbook::{Cell, Sheet};

/// Default layout: discover the header row and the code column, then emit one
/// record per (institution row, year column). Records keep source row order and,
/// within a row, header order.
pub struct StandardExtractor {
    header_scan_rows: usize,
}

impl StandardExtractor {
    pub fn new(header_scan_rows: usize) -> Self {
        Self { header_scan_rows }
    }
}

impl LayoutExtractor for StandardExtractor {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn extract(&self, sheet: &Sheet, metric_code: &str) -> Result<Extraction, ExtractError> {
        let header = locate_header(sheet, self.header_scan_rows)
            .ok_or(ExtractError::NoHeaderRow(self.header_scan_rows))?;
        tracing::debug!(
            "Sheet '{}': header row {} with years {:?}",
            sheet.name(),
            header.row + 1,
            header.years.years()
        );

        let code_column = locate_code_column(sheet, header.row);
        if code_column.is_fallback() {
            tracing::warn!(
                "Sheet '{}': no 'Codex' label in header row {}, assuming institution codes in column {}",
                sheet.name(),
                header.row + 1,
                code_column.index() + 1
            );
        }

        let mut extraction = Extraction {
            header_row: Some(header.row),
            codex_fallback: code_column.is_fallback(),
            ..Default::default()
        };

        for (_, cells) in sheet.rows_in(header.row + 1, sheet.height()) {
            let Some(raw_code) = cells.get(code_column.index()).and_then(Cell::trimmed_text) else {
                continue;
            };
            let Some(code) = registry::institution_code(&raw_code) else {
                continue;
            };

            for (year, col) in header.years.iter() {
                let Some(cell) = cells.get(col) else {
                    continue;
                };
                admit(&mut extraction, DataPoint::new(code, year, normalize_value(cell), metric_code));
            }
        }

        finish(extraction)
    }
}
