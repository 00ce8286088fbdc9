// src/batch/validate.rs
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::extractors::values::is_valid_point;
use crate::kennzahl::models::{FileValidation, ValidationReport, ValidationStatus};
use crate::kennzahl::DataPoint;
use crate::storage::StorageManager;
use crate::utils::error::StorageError;

/// Re-reads every emitted JSON file and re-runs the record validator on each element.
/// A bad file is reported, never fatal to the others.
pub fn validate_output(storage: &StorageManager) -> Result<ValidationReport, StorageError> {
    let files = storage
        .data_files()?
        .iter()
        .map(|path| FileValidation {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            status: validate_file(path),
        })
        .collect();

    Ok(ValidationReport { files })
}

/// The fields the record validator looks at. Anything else in an element,
/// including `kennzahl`, is ignored; a missing `value` reads as `null`.
#[derive(Debug, Deserialize)]
struct RecordFields {
    #[serde(rename = "uniCode")]
    institution_code: String,
    year: f64, // 2021 and 2021.0 are the same year
    #[serde(default)]
    value: Option<f64>,
}

fn is_valid_element(item: &serde_json::Value) -> bool {
    let Ok(fields) = RecordFields::deserialize(item) else {
        return false;
    };
    if fields.year.fract() != 0.0 {
        return false;
    }
    let point = DataPoint::new(&fields.institution_code, fields.year as i32, fields.value, "");
    is_valid_point(&point)
}

pub fn validate_file(path: &Path) -> ValidationStatus {
    match fs::read_to_string(path) {
        Ok(text) => validate_json(&text),
        Err(e) => ValidationStatus::Unparsable { reason: format!("read error: {}", e) },
    }
}

pub fn validate_json(text: &str) -> ValidationStatus {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return ValidationStatus::Unparsable { reason: format!("JSON error: {}", e) },
    };

    let Some(items) = value.as_array() else {
        return ValidationStatus::Unparsable { reason: "not an array".to_string() };
    };

    let invalid = items.iter().filter(|item| !is_valid_element(item)).count();

    if invalid == 0 {
        ValidationStatus::Valid { points: items.len() }
    } else {
        ValidationStatus::PartiallyInvalid { invalid, total: items.len() }
    }
}

pub fn print_validation_report(report: &ValidationReport) {
    for file in &report.files {
        match &file.status {
            ValidationStatus::Valid { points } => println!("  [OK]   {}: {} points", file.file, points),
            ValidationStatus::PartiallyInvalid { invalid, total } => {
                println!("  [WARN] {}: {} of {} points invalid", file.file, invalid, total)
            }
            ValidationStatus::Unparsable { reason } => println!("  [FAIL] {}: {}", file.file, reason),
        }
    }

    println!(
        "\nResult: {} OK, {} with invalid points, {} unparsable",
        report.valid_count(),
        report.partially_invalid_count(),
        report.unparsable_count()
    );
}
