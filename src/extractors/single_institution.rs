// src/extractors/single_institution.rs
use crate::extractors::values::normalize_value;
use crate::extractors::year::extract_year;
use crate::extractors::{admit, finish, LayoutExtractor};
use crate::kennzahl::{DataPoint, Extraction};
use crate::utils::error::ExtractError;
use crate::workbook::Sheet;

// Fixed layout of the workbook, 1-based rows as shown in a spreadsheet.
const FIRST_ROW: usize = 17;
const LAST_ROW: usize = 99;
const PERIOD_COL: usize = 0; // A: "Studienjahr 2023/24"
const CODE_COL: usize = 2; // C: institution code, possibly embedded in text
const VALUE_COL: usize = 4; // E

/// Workbook that reports a single institution in a fixed row window.
/// No header discovery; a row counts only if it has a year label and mentions the institution.
pub struct SingleInstitutionExtractor {
    institution: &'static str,
}

impl SingleInstitutionExtractor {
    pub fn new(institution: &'static str) -> Self {
        Self { institution }
    }

    fn confirms_institution(&self, sheet: &Sheet, row: usize) -> bool {
        sheet
            .cell(row, CODE_COL)
            .text()
            .is_some_and(|text| text.trim().contains(self.institution))
    }
}

impl LayoutExtractor for SingleInstitutionExtractor {
    fn name(&self) -> &'static str {
        "single-institution"
    }

    fn extract(&self, sheet: &Sheet, metric_code: &str) -> Result<Extraction, ExtractError> {
        let mut extraction = Extraction::default();

        for (row, _) in sheet.rows_in(FIRST_ROW - 1, LAST_ROW) {
            let Some(year) = sheet.cell(row, PERIOD_COL).text().and_then(|t| extract_year(&t)) else {
                continue;
            };
            if !self.confirms_institution(sheet, row) {
                continue;
            }

            tracing::trace!("Row {}: {} {}", row + 1, self.institution, year);
            let value = normalize_value(sheet.cell(row, VALUE_COL));
            admit(&mut extraction, DataPoint::new(self.institution, year, value, metric_code));
        }

        tracing::debug!(
            "Sheet '{}': {} row(s) for {} in rows {}-{}",
            sheet.name(),
            extraction.candidate_count(),
            self.institution,
            FIRST_ROW,
            LAST_ROW
        );
        finish(extraction)
    }
}
