// src/batch/mod.rs
pub mod analyze;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::{extractor_for, ExtractionConfig};
use crate::kennzahl::models::{BatchReport, ConversionSummary, FileOutcome, FileReport};
use crate::kennzahl::registry;
use crate::storage::StorageManager;
use crate::utils::error::ConvertError;
use crate::utils::AppError;
use crate::workbook::Workbook;

/// A workbook found in the data directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    pub metric: Option<&'static str>, // None when the file is not in the mapping table
}

/// Lists `*.xlsx` workbooks in `data_dir`, sorted by name.
/// Without a filter only mapped files are returned; with one, any file whose name
/// contains the filter or whose metric code equals it.
pub fn discover_files(data_dir: &Path, filter: Option<&str>) -> Result<Vec<SourceFile>, AppError> {
    if !data_dir.is_dir() {
        return Err(AppError::Config(format!(
            "Data directory not found: {}",
            data_dir.display()
        )));
    }

    let mut files: Vec<SourceFile> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "xlsx"))
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?.to_string();
            let metric = registry::metric_for_file(&file_name);
            Some(SourceFile { path, file_name, metric })
        })
        .filter(|source| match filter {
            Some(f) => source.file_name.contains(f) || source.metric == Some(f),
            None => source.metric.is_some(),
        })
        .collect();

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}

/// Kennzahl workbooks (`1-`, `2-`, `3-` prefixed) present in `data_dir`, mapped or not.
/// Listed when a filter matches nothing, so a mistyped `--file` can be spotted.
pub fn available_workbooks(data_dir: &Path) -> Result<Vec<String>, AppError> {
    let mut names: Vec<String> = fs::read_dir(data_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "xlsx"))
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .filter(|name| ["1-", "2-", "3-"].iter().any(|prefix| name.starts_with(prefix)))
        .collect();

    names.sort();
    Ok(names)
}

/// Converts one workbook end to end and writes `<metric>.json`.
pub fn convert_file(
    path: &Path,
    metric_code: &str,
    storage: &StorageManager,
    config: &ExtractionConfig,
) -> Result<ConversionSummary, ConvertError> {
    let mut workbook = Workbook::open(path)?;
    let sheet = workbook.read_primary_sheet()?;

    let extractor = extractor_for(metric_code, config);
    tracing::debug!("Using {} extractor for {}", extractor.name(), metric_code);
    let extraction = extractor.extract(&sheet, metric_code)?;

    let output = storage.save_data_points(metric_code, &extraction.points)?;
    let output_name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.display().to_string());

    Ok(extraction.summarize(output_name))
}

/// Converts every file; a failing file is recorded and the batch moves on.
pub fn run_conversion(files: &[SourceFile], storage: &StorageManager, config: &ExtractionConfig) -> BatchReport {
    let mut reports = Vec::with_capacity(files.len());

    for source in files {
        let Some(metric) = source.metric else {
            tracing::warn!("Skipping {}: no metric mapping", source.file_name);
            continue;
        };

        tracing::info!("Converting {} -> {}.json", source.file_name, metric);
        let outcome = match convert_file(&source.path, metric, storage, config) {
            Ok(summary) => {
                tracing::info!(
                    "{}: {} data points, {} institutions, years {:?}",
                    metric,
                    summary.data_points,
                    summary.universities,
                    summary.years
                );
                for code in &summary.unis {
                    tracing::debug!("  {} {}", code, registry::institution_name(code).unwrap_or("?"));
                }
                FileOutcome::Converted(summary)
            }
            Err(e) => {
                tracing::error!("Failed to convert {}: {}", source.file_name, e);
                FileOutcome::Failed { error: e.to_string() }
            }
        };

        reports.push(FileReport {
            file: source.file_name.clone(),
            kennzahl: metric.to_string(),
            outcome,
        });
    }

    BatchReport::new(reports)
}

pub fn print_conversion_report(report: &BatchReport) {
    for file in &report.files {
        match &file.outcome {
            FileOutcome::Converted(summary) => {
                let invalid = if summary.invalid_points > 0 {
                    format!(", {} invalid", summary.invalid_points)
                } else {
                    String::new()
                };
                let fallback = if summary.codex_fallback { " (code column assumed)" } else { "" };
                println!(
                    "  [OK]   {} -> {}: {} points, {} institutions, years {:?}{}{}",
                    file.file, summary.output, summary.data_points, summary.universities, summary.years, invalid, fallback
                );
            }
            FileOutcome::Failed { error } => {
                println!("  [FAIL] {} ({}): {}", file.file, file.kennzahl, error);
            }
        }
    }

    println!(
        "\nDone: {}/{} files converted, {} data points total",
        report.converted,
        report.converted + report.failed,
        report.total_data_points
    );
    println!("Date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
}
