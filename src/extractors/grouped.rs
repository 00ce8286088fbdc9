// src/extractors/grouped.rs
use crate::extractors::header::HeaderMap;
use crate::extractors::values::normalize_value;
use crate::extractors::year::extract_year;
use crate::extractors::{admit, finish, LayoutExtractor};
use crate::kennzahl::{registry, DataPoint, Extraction};
use crate::utils::error::ExtractError;
use crate::workbook::{Cell, Sheet};

// Fixed layout of the workbook, 1-based rows as shown in a spreadsheet.
const HEADER_ROW: usize = 11;
const YEAR_SCAN_COLS: usize = 19; // A..S
const TOTAL_COLUMN_OFFSET: usize = 2; // total sub-column sits two right of the year label
const FIRST_DATA_ROW: usize = 13;
const LAST_DATA_ROW: usize = 299;
const NAME_COL: usize = 0; // A
const LETTER_COL: usize = 1; // B
const CATEGORY_COL: usize = 2; // C
const TOTAL_MARKER: &str = "Insgesamt";

/// Workbook that groups category rows under institution header rows, with
/// institutions given as single letters. Only each group's "Insgesamt" row is published.
pub struct GroupedRowExtractor;

/// Carried through the row walk: the institution set by the last group header.
struct RowWalk {
    current: Option<&'static str>,
    extraction: Extraction,
}

impl GroupedRowExtractor {
    /// Year → value column (the total sub-column, not the label column).
    fn value_columns(sheet: &Sheet) -> HeaderMap {
        let mut columns = HeaderMap::default();
        for col in 0..YEAR_SCAN_COLS {
            let year = sheet.cell(HEADER_ROW - 1, col).text().and_then(|t| extract_year(&t));
            if let Some(year) = year {
                columns.insert(year, col + TOTAL_COLUMN_OFFSET);
            }
        }
        columns
    }

    /// A row with an institution name and a known letter starts a new group.
    fn group_start(cells: &[Cell]) -> Option<&'static str> {
        let name = cells.get(NAME_COL)?;
        let letter = cells.get(LETTER_COL)?;
        if name.is_blank() || letter.is_blank() {
            return None;
        }
        registry::institution_for_letter(&letter.trimmed_text()?)
    }

    fn is_total_row(cells: &[Cell]) -> bool {
        cells
            .get(CATEGORY_COL)
            .and_then(Cell::text)
            .is_some_and(|text| text.contains(TOTAL_MARKER))
    }
}

impl LayoutExtractor for GroupedRowExtractor {
    fn name(&self) -> &'static str {
        "grouped-rows"
    }

    fn extract(&self, sheet: &Sheet, metric_code: &str) -> Result<Extraction, ExtractError> {
        let columns = Self::value_columns(sheet);
        if columns.is_empty() {
            return Err(ExtractError::NoYearColumns(HEADER_ROW));
        }
        tracing::debug!(
            "Sheet '{}': year value columns {:?}",
            sheet.name(),
            columns.iter().collect::<Vec<_>>()
        );

        let start = RowWalk {
            current: None,
            extraction: Extraction {
                header_row: Some(HEADER_ROW - 1),
                ..Default::default()
            },
        };

        let walk = sheet
            .rows_in(FIRST_DATA_ROW - 1, LAST_DATA_ROW)
            .fold(start, |mut walk, (row, cells)| {
                if let Some(code) = Self::group_start(cells) {
                    tracing::trace!("Row {}: group {}", row + 1, code);
                    walk.current = Some(code);
                }

                if let Some(code) = walk.current.filter(|_| Self::is_total_row(cells)) {
                    for (year, col) in columns.iter() {
                        let value = normalize_value(sheet.cell(row, col));
                        admit(&mut walk.extraction, DataPoint::new(code, year, value, metric_code));
                    }
                }
                walk
            });

        finish(walk.extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row(labels: &[(usize, &str)]) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; YEAR_SCAN_COLS];
        for (col, label) in labels {
            cells[*col] = Cell::from(*label);
        }
        cells
    }

    fn data_row(name: &str, letter: &str, category: &str, values: &[(usize, f64)]) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; 12];
        cells[NAME_COL] = Cell::from(name);
        cells[LETTER_COL] = Cell::from(letter);
        cells[CATEGORY_COL] = Cell::from(category);
        for (col, value) in values {
            cells[*col] = Cell::Number(*value);
        }
        cells
    }

    /// Header on row 11 with "Studienjahr 2022/23" in D (col 3), data from row 13.
    fn sheet_with(data: Vec<Vec<Cell>>) -> Sheet {
        let mut rows = vec![Vec::new(); HEADER_ROW - 1];
        rows.push(header_row(&[(3, "Studienjahr 2022/23")]));
        rows.push(Vec::new());
        rows.extend(data);
        Sheet::new("Tab", rows)
    }

    #[test]
    fn test_only_total_row_of_group_is_extracted() {
        let sheet = sheet_with(vec![
            data_row("Universität Graz", "B", "", &[]),
            data_row("", "", "mit Auslandsaufenthalt", &[(5, 3.0)]),
            data_row("", "", "Insgesamt", &[(5, 5.0), (3, 99.0)]),
        ]);

        let extraction = GroupedRowExtractor.extract(&sheet, "3-A-3").unwrap();
        assert_eq!(extraction.points, vec![DataPoint::new("UB", 2022, Some(5.0), "3-A-3")]);
    }

    #[test]
    fn test_current_institution_is_sticky() {
        let sheet = sheet_with(vec![
            data_row("Universität Wien", "A", "Bachelor", &[(5, 1.0)]),
            data_row("", "", "Insgesamt", &[(5, 10.0)]),
            data_row("", "", "Master", &[(5, 2.0)]),
            data_row("", "", "Insgesamt gesamt", &[(5, 11.0)]),
            data_row("Universität Graz", "B", "Insgesamt", &[(5, 20.0)]),
        ]);

        let extraction = GroupedRowExtractor.extract(&sheet, "3-A-3").unwrap();
        assert_eq!(
            extraction.points,
            vec![
                DataPoint::new("UA", 2022, Some(10.0), "3-A-3"),
                DataPoint::new("UA", 2022, Some(11.0), "3-A-3"),
                DataPoint::new("UB", 2022, Some(20.0), "3-A-3"),
            ]
        );
    }

    #[test]
    fn test_total_rows_before_any_group_are_skipped() {
        let sheet = sheet_with(vec![
            data_row("", "", "Insgesamt", &[(5, 7.0)]),
            data_row("Österreich", "P", "Insgesamt", &[(5, 8.0)]), // unknown letter
            data_row("Universität Salzburg", "D", "Insgesamt", &[(5, 9.0)]),
        ]);

        let extraction = GroupedRowExtractor.extract(&sheet, "3-A-3").unwrap();
        assert_eq!(extraction.points, vec![DataPoint::new("UD", 2022, Some(9.0), "3-A-3")]);
    }

    #[test]
    fn test_each_year_maps_to_offset_column() {
        let mut rows = vec![Vec::new(); HEADER_ROW - 1];
        rows.push(header_row(&[(3, "Studienjahr 2022/23"), (7, "Studienjahr 2021/22")]));
        rows.push(Vec::new());
        rows.push(data_row("TU Wien", "E", "Insgesamt", &[(5, 1.0), (9, 2.0)]));
        let sheet = Sheet::new("Tab", rows);

        let columns = GroupedRowExtractor::value_columns(&sheet);
        assert_eq!(columns.iter().collect::<Vec<_>>(), vec![(2022, 5), (2021, 9)]);

        let extraction = GroupedRowExtractor.extract(&sheet, "3-A-3").unwrap();
        assert_eq!(
            extraction.points,
            vec![
                DataPoint::new("UE", 2022, Some(1.0), "3-A-3"),
                DataPoint::new("UE", 2021, Some(2.0), "3-A-3"),
            ]
        );
    }

    #[test]
    fn test_invalid_years_are_counted() {
        let mut rows = vec![Vec::new(); HEADER_ROW - 1];
        rows.push(header_row(&[(3, "Studienjahr 2022/23"), (7, "Studienjahr 2010/11")]));
        rows.push(Vec::new());
        rows.push(data_row("TU Graz", "F", "Insgesamt", &[(5, 1.0), (9, 2.0)]));
        let sheet = Sheet::new("Tab", rows);

        let extraction = GroupedRowExtractor.extract(&sheet, "3-A-3").unwrap();
        assert_eq!(extraction.points.len(), 1);
        assert_eq!(extraction.invalid_count, 1);
        assert_eq!(extraction.points.len() + extraction.invalid_count, extraction.candidate_count());
    }

    #[test]
    fn test_missing_header_is_an_error() {
        let sheet = Sheet::new("Tab", vec![data_row("Universität Graz", "B", "Insgesamt", &[(5, 1.0)])]);
        assert_eq!(
            GroupedRowExtractor.extract(&sheet, "3-A-3"),
            Err(ExtractError::NoYearColumns(HEADER_ROW))
        );
    }
}
