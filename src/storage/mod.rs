// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::kennzahl::models::BatchReport;
use crate::kennzahl::DataPoint;
use crate::utils::error::StorageError;

/// Run reports go in a subdirectory so the data-file listing never picks them up.
const REPORT_DIR: &str = "meta";
const REPORT_FILE: &str = "conversion-report.json";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the JSON array for a metric: `<base_dir>/<metric>.json`
    pub fn data_file_path(&self, metric_code: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", metric_code))
    }

    /// Writes (and fully overwrites) the JSON array of data points for a metric
    pub fn save_data_points(&self, metric_code: &str, points: &[DataPoint]) -> Result<PathBuf, StorageError> {
        let file_path = self.data_file_path(metric_code);

        let json = serde_json::to_string_pretty(points)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json)
            .map_err(StorageError::IoError)?;

        tracing::debug!("Saved {} data points to {}", points.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves the run report in JSON format under `<base_dir>/meta/`
    pub fn save_report(&self, report: &BatchReport) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(REPORT_DIR);

        // Create the directories if they don't exist
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)
                .map_err(StorageError::IoError)?;
        }

        let file_path = target_dir.join(REPORT_FILE);

        let report_str = serde_json::to_string_pretty(report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, report_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved conversion report to {}", file_path.display());

        Ok(file_path)
    }

    /// Top-level `*.json` files, sorted by name
    pub fn data_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }
}
