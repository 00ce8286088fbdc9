// src/kennzahl/models.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One published measurement: institution × year × metric.
/// Field names on the wire match what the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(rename = "uniCode")]
    pub institution_code: String,
    pub year: i32,
    pub value: Option<f64>, // `null` when the cell held no usable number
    #[serde(rename = "kennzahl")]
    pub metric_code: String,
}

impl DataPoint {
    pub fn new(institution_code: &str, year: i32, value: Option<f64>, metric_code: &str) -> Self {
        Self {
            institution_code: institution_code.to_string(),
            year,
            value,
            metric_code: metric_code.to_string(),
        }
    }
}

/// What an extractor hands back for one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub points: Vec<DataPoint>,
    pub invalid_count: usize,
    pub header_row: Option<usize>, // 0-based
    pub codex_fallback: bool,
}

impl Extraction {
    /// Valid plus dropped candidates.
    pub fn candidate_count(&self) -> usize {
        self.points.len() + self.invalid_count
    }

    pub fn institutions(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.institution_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn years(&self) -> Vec<i32> {
        self.points
            .iter()
            .map(|p| p.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summarize(&self, output: String) -> ConversionSummary {
        let unis = self.institutions();
        ConversionSummary {
            output,
            data_points: self.points.len(),
            invalid_points: self.invalid_count,
            universities: unis.len(),
            years: self.years(),
            unis,
            header_row: self.header_row.map(|r| r + 1),
            codex_fallback: self.codex_fallback,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSummary {
    pub output: String,
    pub data_points: usize,
    pub invalid_points: usize,
    pub universities: usize,
    pub years: Vec<i32>,
    pub unis: Vec<String>,
    pub header_row: Option<usize>, // 1-based, as shown in a spreadsheet
    pub codex_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Converted(ConversionSummary),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: String,
    pub kennzahl: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn summary(&self) -> Option<&ConversionSummary> {
        match &self.outcome {
            FileOutcome::Converted(summary) => Some(summary),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// Result of a whole conversion run, persisted next to the output files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub generated_at: String,
    pub converted: usize,
    pub failed: usize,
    pub total_data_points: usize,
    pub total_invalid_points: usize,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        let summaries: Vec<&ConversionSummary> = files.iter().filter_map(FileReport::summary).collect();
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            converted: summaries.len(),
            failed: files.len() - summaries.len(),
            total_data_points: summaries.iter().map(|s| s.data_points).sum(),
            total_invalid_points: summaries.iter().map(|s| s.invalid_points).sum(),
            files,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationStatus {
    Valid { points: usize },
    PartiallyInvalid { invalid: usize, total: usize },
    Unparsable { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileValidation {
    pub file: String,
    pub status: ValidationStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub files: Vec<FileValidation>,
}

impl ValidationReport {
    fn count(&self, pred: impl Fn(&ValidationStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }

    pub fn valid_count(&self) -> usize {
        self.count(|s| matches!(s, ValidationStatus::Valid { .. }))
    }

    pub fn partially_invalid_count(&self) -> usize {
        self.count(|s| matches!(s, ValidationStatus::PartiallyInvalid { .. }))
    }

    pub fn unparsable_count(&self) -> usize {
        self.count(|s| matches!(s, ValidationStatus::Unparsable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_point_wire_format() {
        let point = DataPoint::new("UA", 2021, Some(10.0), "1-A-1");
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"uniCode": "UA", "year": 2021, "value": 10.0, "kennzahl": "1-A-1"})
        );

        let missing = DataPoint::new("UB", 2022, None, "1-A-1");
        assert!(serde_json::to_value(&missing).unwrap()["value"].is_null());
    }

    #[test]
    fn test_summary_counts() {
        let extraction = Extraction {
            points: vec![
                DataPoint::new("UB", 2022, Some(1.0), "2-A-5"),
                DataPoint::new("UA", 2021, None, "2-A-5"),
                DataPoint::new("UA", 2022, Some(3.0), "2-A-5"),
            ],
            invalid_count: 2,
            header_row: Some(4),
            codex_fallback: true,
        };
        assert_eq!(extraction.candidate_count(), 5);

        let summary = extraction.summarize("2-A-5.json".to_string());
        assert_eq!(summary.data_points, 3);
        assert_eq!(summary.invalid_points, 2);
        assert_eq!(summary.universities, 2);
        assert_eq!(summary.unis, vec!["UA", "UB"]);
        assert_eq!(summary.years, vec![2021, 2022]);
        assert_eq!(summary.header_row, Some(5));
        assert!(summary.codex_fallback);
    }

    #[test]
    fn test_batch_report_totals() {
        let ok = FileReport {
            file: "a.xlsx".to_string(),
            kennzahl: "1-A-1".to_string(),
            outcome: FileOutcome::Converted(
                Extraction {
                    points: vec![DataPoint::new("UA", 2021, Some(1.0), "1-A-1")],
                    invalid_count: 1,
                    ..Default::default()
                }
                .summarize("1-A-1.json".to_string()),
            ),
        };
        let failed = FileReport {
            file: "b.xlsx".to_string(),
            kennzahl: "1-A-2".to_string(),
            outcome: FileOutcome::Failed { error: "boom".to_string() },
        };

        let report = BatchReport::new(vec![ok, failed]);
        assert_eq!(report.converted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total_data_points, 1);
        assert_eq!(report.total_invalid_points, 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"][0]["status"], "converted");
        assert_eq!(json["files"][0]["codexFallback"], false);
        assert_eq!(json["files"][1]["status"], "failed");
        assert_eq!(json["files"][1]["error"], "boom");
    }
}
