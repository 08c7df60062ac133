//! CLI entry point for the cleaning and conversion pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tidysheet::{
    BatchReport, CleaningOperation, ExportFormat, FileOutcome, FileRequest, PipelineConfig,
    ProcessedFile, UploadedFile, process_batch,
};
use tracing::{error, info, warn};

/// CLI-compatible cleaning operation enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCleaningOperation {
    /// Drop rows identical to an earlier row
    RemoveDuplicates,
    /// Fill missing numeric cells with the column mean
    FillMissingNumeric,
}

impl From<CliCleaningOperation> for CleaningOperation {
    fn from(cli: CliCleaningOperation) -> Self {
        match cli {
            CliCleaningOperation::RemoveDuplicates => CleaningOperation::RemoveDuplicates,
            CliCleaningOperation::FillMissingNumeric => CleaningOperation::FillMissingNumeric,
        }
    }
}

/// CLI-compatible export format enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    /// Comma-separated values
    Csv,
    /// Excel workbook (.xlsx)
    #[value(alias = "xlsx")]
    Excel,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli: CliExportFormat) -> Self {
        match cli {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean, trim and convert CSV and Excel tables",
    long_about = "Load CSV or Excel files, optionally clean them, keep a subset of columns \
                  and export the result as CSV or Excel.\n\n\
                  EXAMPLES:\n  \
                  # Preview a file\n  \
                  tidysheet data.csv\n\n  \
                  # Deduplicate, fill gaps and convert to Excel\n  \
                  tidysheet data.csv --clean remove-duplicates --clean fill-missing-numeric --to excel\n\n  \
                  # Keep two columns of several files\n  \
                  tidysheet a.csv b.xlsx --columns id,amount --to csv -o cleaned/"
)]
struct Args {
    /// Input files (.csv or .xlsx)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Cleaning operation to apply; repeat to apply several, in order
    #[arg(long = "clean", value_enum)]
    clean: Vec<CliCleaningOperation>,

    /// Columns to keep, comma-separated, in output order
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Export format; nothing is written when omitted
    #[arg(long = "to", value_enum)]
    to: Option<CliExportFormat>,

    /// Output directory for exported files
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Field separator for CSV input
    #[arg(long, default_value = ",")]
    separator: char,

    /// Number of rows shown in previews
    #[arg(long, default_value = "5")]
    preview_rows: usize,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the batch report.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and results)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.separator.is_ascii() {
        return Err(anyhow!(
            "Separator must be a single ASCII character, got '{}'",
            args.separator
        ));
    }

    let config = PipelineConfig::builder()
        .csv_separator(args.separator as u8)
        .preview_rows(args.preview_rows)
        .build()?;

    let files = read_inputs(&args.files);
    if files.is_empty() {
        return Err(anyhow!("None of the input files could be read"));
    }

    let request = FileRequest {
        operations: args.clean.iter().map(|&op| op.into()).collect(),
        columns: args.columns.clone(),
        export: args.to.map(Into::into),
    };

    let report = process_batch(&files, &config, |_| request.clone());

    let written = write_exports(&report, &args.output);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human_readable_summary(&report, &config, &written);
    }

    if report.succeeded() == 0 {
        return Err(anyhow!("No file could be processed"));
    }
    Ok(())
}

/// Read every path into an [`UploadedFile`], skipping unreadable ones.
fn read_inputs(paths: &[PathBuf]) -> Vec<UploadedFile> {
    paths
        .iter()
        .filter_map(|path| match fs::read(path) {
            Ok(bytes) => Some(UploadedFile::new(file_name(path), bytes)),
            Err(e) => {
                error!("Cannot read {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write each export into `dir`, returning the written paths.
///
/// A file that cannot be written is logged and skipped; the other exports
/// are still written.
fn write_exports(report: &BatchReport, dir: &Path) -> Vec<PathBuf> {
    let exports: Vec<_> = report
        .files
        .iter()
        .filter_map(FileOutcome::processed)
        .filter_map(|file| file.export.as_ref())
        .collect();

    if exports.is_empty() {
        return Vec::new();
    }

    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            error!("Cannot create output directory {}: {}", dir.display(), e);
            return Vec::new();
        }
        info!("Created output directory: {}", dir.display());
    }

    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        let path = dir.join(&export.filename);
        if written.contains(&path) {
            warn!("{} was already written in this run; overwriting", path.display());
        }
        if let Err(e) = fs::write(&path, &export.bytes) {
            error!("Cannot write {}: {}", path.display(), e);
            continue;
        }
        info!("Saved {} ({})", path.display(), export.mime_type);
        written.push(path);
    }
    written
}

/// Print the batch results for a terminal.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
fn print_human_readable_summary(
    report: &BatchReport,
    config: &PipelineConfig,
    written: &[PathBuf],
) {
    println!();
    println!("{}", "=".repeat(80));
    println!(
        "PROCESSED {} OF {} FILES",
        report.succeeded(),
        report.files.len()
    );
    println!("{}", "=".repeat(80));

    for outcome in &report.files {
        println!();
        match outcome {
            FileOutcome::Processed(file) => print_processed(file, config),
            FileOutcome::Failed { name, error } => {
                println!("{name}");
                println!("{}", "-".repeat(40));
                println!("  Skipped: {error}");
            }
        }
    }

    if !written.is_empty() {
        println!();
        println!("Output Files:");
        for path in written {
            println!("  - {}", path.display());
        }
    }
    println!();
}

fn print_processed(file: &ProcessedFile, config: &PipelineConfig) {
    println!("{}", file.name);
    println!("{}", "-".repeat(40));
    println!(
        "  Rows: {} -> {}",
        file.preview.total_rows,
        file.table.height()
    );
    println!("  Columns: {}", file.table.width());

    if !file.messages.is_empty() {
        println!("  Cleaning:");
        for message in &file.messages {
            println!("    - {message}");
        }
    }

    if !file.chart_columns.is_empty() {
        println!("  Numeric columns: {}", file.chart_columns.join(", "));
    }

    if let Some(export) = &file.export {
        println!("  Export: {} ({} bytes)", export.filename, export.len());
    }

    println!();
    println!("{}", file.table.head(config.preview_rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, b"a,b\n1,2\n".to_vec())
    }

    #[test]
    fn test_write_exports_skips_unwritable_file() {
        let dir = std::env::temp_dir().join(format!("tidysheet-write-{}", std::process::id()));
        fs::create_dir_all(dir.join("blocked.csv")).unwrap();

        let files = vec![csv_upload("blocked.csv"), csv_upload("open.csv")];
        let report = process_batch(&files, &PipelineConfig::default(), |_| {
            FileRequest::new().export(ExportFormat::Csv)
        });

        let written = write_exports(&report, &dir);

        assert_eq!(written, vec![dir.join("open.csv")]);
        assert!(dir.join("open.csv").is_file());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_exports_without_exports_writes_nothing() {
        let dir = std::env::temp_dir().join("tidysheet-never-created");
        let files = vec![csv_upload("plain.csv")];
        let report = process_batch(&files, &PipelineConfig::default(), |_| FileRequest::new());

        assert!(write_exports(&report, &dir).is_empty());
        assert!(!dir.exists());
    }
}
