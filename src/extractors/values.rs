// src/extractors/values.rs
use crate::kennzahl::{registry, DataPoint};
use crate::workbook::Cell;

/// Coerces a raw cell to a number. Absent cells, unparsable text and
/// non-finite results all come back as `None`; malformed input is "no data", not an error.
pub fn normalize_value(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => return None,
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// A record is kept only if its institution, year and value all fall in their known domains.
pub fn is_valid_point(point: &DataPoint) -> bool {
    registry::is_valid_institution(&point.institution_code)
        && registry::is_valid_year(point.year)
        && point.value.map_or(true, f64::is_finite)
}
