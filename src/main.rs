// src/main.rs
mod batch;
mod extractors;
mod kennzahl;
mod storage;
mod utils;
mod workbook;

use std::path::PathBuf;

use clap::Parser;
use extractors::header::DEFAULT_HEADER_SCAN_ROWS;
use extractors::ExtractionConfig;
use storage::StorageManager;
use utils::AppError;

/// Converts Wissensbilanz Excel workbooks into JSON arrays of data points
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the source workbooks
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output directory for the <metric>.json files
    #[arg(short, long, default_value = "docs/data/json")]
    output_dir: PathBuf,

    /// Only process files whose name contains this text or whose metric code equals it (e.g. 1-A-1)
    #[arg(short, long)]
    file: Option<String>,

    /// Only analyze workbook structure, write nothing
    #[arg(long, conflicts_with = "validate")]
    analyze: bool,

    /// Validate the JSON files already in the output directory
    #[arg(long)]
    validate: bool,

    /// Number of leading rows searched for the year header
    #[arg(long, default_value_t = DEFAULT_HEADER_SCAN_ROWS)]
    header_scan_rows: usize,

    /// Verbose output (debug logging, sample rows in analyze mode)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    if args.header_scan_rows == 0 {
        return Err(AppError::Config("--header-scan-rows must be at least 1".to_string()));
    }

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;
    tracing::info!("Data:   {}", args.data_dir.display());
    tracing::info!("Output: {}", storage.base_dir().display());

    // 4. Validate mode works on the output directory only
    if args.validate {
        tracing::info!("Validating output files");
        let report = batch::validate::validate_output(&storage)?;
        batch::validate::print_validation_report(&report);
        return Ok(());
    }

    // 5. Collect source files
    let files = batch::discover_files(&args.data_dir, args.file.as_deref())?;
    if files.is_empty() {
        tracing::warn!("No matching workbooks found in {}", args.data_dir.display());
        println!("Available workbooks:");
        for name in batch::available_workbooks(&args.data_dir)? {
            println!("  - {}", name);
        }
        return Ok(());
    }
    tracing::info!("{} file(s) to process", files.len());

    // 6. Analyze mode
    if args.analyze {
        for source in &files {
            match batch::analyze::analyze_workbook(&source.path, args.header_scan_rows) {
                Ok(analysis) => batch::analyze::print_analysis(&analysis, args.verbose),
                Err(e) => tracing::error!("Failed to analyze {}: {}", source.file_name, e),
            }
        }
        return Ok(());
    }

    // 7. Convert
    let config = ExtractionConfig { header_scan_rows: args.header_scan_rows };
    let report = batch::run_conversion(&files, &storage, &config);

    if let Err(e) = storage.save_report(&report) {
        tracing::error!("Failed to save conversion report: {}", e);
    }
    batch::print_conversion_report(&report);

    tracing::info!(
        "Processing finished. Converted: {}, Failed: {}",
        report.converted,
        report.failed
    );

    Ok(())
}
