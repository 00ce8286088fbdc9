// src/extractors/mod.rs
pub mod grouped;
pub mod header;
pub mod single_institution;
pub mod standard;
pub mod values;
pub mod year;

use crate::kennzahl::{registry, DataPoint, Extraction};
use crate::utils::error::ExtractError;
use crate::workbook::Sheet;

pub use grouped::GroupedRowExtractor;
pub use single_institution::SingleInstitutionExtractor;
pub use standard::StandardExtractor;

/// Tunables shared by the extractors.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub header_scan_rows: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { header_scan_rows: header::DEFAULT_HEADER_SCAN_ROWS }
    }
}

/// One way of turning a sheet layout into data points.
/// Implementations are pure: same sheet in, same ordered records out.
pub trait LayoutExtractor {
    fn name(&self) -> &'static str;

    fn extract(&self, sheet: &Sheet, metric_code: &str) -> Result<Extraction, ExtractError>;
}

/// Picks the layout for a metric: the two non-conforming workbooks get their
/// fixed-layout extractors, everything else is discovered.
pub fn extractor_for(metric_code: &str, config: &ExtractionConfig) -> Box<dyn LayoutExtractor> {
    match metric_code {
        registry::SINGLE_INSTITUTION_METRIC => {
            Box::new(SingleInstitutionExtractor::new(registry::SINGLE_INSTITUTION_CODE))
        }
        registry::GROUPED_LETTER_METRIC => Box::new(GroupedRowExtractor),
        _ => Box::new(StandardExtractor::new(config.header_scan_rows)),
    }
}

/// Validates a candidate and either keeps it or counts it as dropped.
fn admit(extraction: &mut Extraction, point: DataPoint) {
    if values::is_valid_point(&point) {
        extraction.points.push(point);
    } else {
        tracing::debug!("Dropping invalid data point: {:?}", point);
        extraction.invalid_count += 1;
    }
}

fn finish(extraction: Extraction) -> Result<Extraction, ExtractError> {
    if extraction.points.is_empty() {
        return Err(ExtractError::NoValidDataPoints);
    }
    Ok(extraction)
}
