//! Command-line front end: one run cleans and converts every given file.

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use data_cleaner::pipeline::preview::render_columns;
use data_cleaner::FileOutcome;
use data_cleaner::FilePipeline;
use data_cleaner::FileReport;
use data_cleaner::FileSettings;
use data_cleaner::Format;
use data_cleaner::PipelineConfig;
use data_cleaner::Plan;
use data_cleaner::UploadedFile;
use std::path::Path;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Clean data by removing duplicates and filling missing values, and convert files between CSV and Excel.
#[derive(Parser, Debug)]
#[command(name = "data-cleaner", version, about)]
struct Args {
    /// Input files (.csv, .xlsx, .xls); glob patterns are expanded
    #[arg(required = true)]
    files: Vec<String>,

    /// Remove rows that repeat an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Fill missing values of numeric columns with the column mean
    #[arg(long)]
    fill_missing: bool,

    /// Columns to keep, in output order (default: all columns)
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Show a bar chart of the numeric columns
    #[arg(long)]
    chart: bool,

    /// Convert to csv or excel
    #[arg(long = "to")]
    to: Option<Format>,

    /// Directory converted files are written to
    #[arg(long, env = "DATA_CLEANER_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Number of rows shown in the preview
    #[arg(long, env = "DATA_CLEANER_PREVIEW_ROWS", default_value_t = 5)]
    preview_rows: usize,

    /// CSV field values read as missing; replaces the default set
    #[arg(long = "null-value")]
    null_values: Vec<String>,

    /// Maximum number of rows drawn in the chart
    #[arg(long, default_value_t = 20)]
    chart_rows: usize,

    /// Width of the longest chart bar in characters
    #[arg(long, default_value_t = 40)]
    chart_width: usize,
}

impl Args {
    fn config(&self) -> PipelineConfig {
        let config = PipelineConfig::default()
            .with_preview_rows(self.preview_rows)
            .with_chart(self.chart_rows, self.chart_width);
        if self.null_values.is_empty() {
            config
        } else {
            config.with_null_values(self.null_values.iter().cloned())
        }
    }

    fn settings(&self) -> FileSettings {
        FileSettings {
            remove_duplicates: self.remove_duplicates,
            fill_missing: self.fill_missing,
            columns: self.columns.clone(),
            chart: self.chart,
            convert: self.to,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("data_cleaner=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(&Args::parse())
}

/// Processes every file, then fails if any of them failed.
fn run(args: &Args) -> Result<()> {
    let files = load_files(&args.files)?;
    let pipeline = FilePipeline::new(args.config());
    let outcomes = pipeline.render(&files, &Plan::from(args.settings()));

    let mut failed = 0usize;
    for outcome in &outcomes {
        match outcome {
            FileOutcome { result: Ok(report), .. } => {
                print_report(report, &pipeline.config);
                if let Some(converted) = &report.converted {
                    let path = args.out_dir.join(&converted.file_name);
                    std::fs::write(&path, converted.bytes())
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Saved {} ({})", path.display(), converted.mime_type);
                    tracing::info!(path = %path.display(), "wrote converted file");
                }
            }
            FileOutcome { result: Err(error), file_name } => {
                failed += 1;
                eprintln!("Error ({}): {error}", error.kind().as_str());
                tracing::debug!(file = %file_name, "skipped file");
            }
        }
        println!();
    }

    if failed > 0 {
        bail!("{failed} of {} files failed", outcomes.len());
    }
    Ok(())
}

/// Expands glob patterns and reads every matching file.
/// A pattern without glob metacharacters names a file directly.
fn load_files(patterns: &[String]) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths: Vec<PathBuf> = if pattern.contains(['*', '?', '[']) {
            glob::glob(pattern)
                .with_context(|| format!("Invalid glob pattern: {pattern}"))?
                .collect::<Result<_, _>>()?
        } else {
            vec![PathBuf::from(pattern)]
        };
        if paths.is_empty() {
            tracing::warn!(pattern = %pattern, "no files match pattern");
        }
        for path in paths {
            let data = std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            files.push(UploadedFile::new(file_name(&path), data));
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(report: &FileReport, config: &PipelineConfig) {
    println!("File Name: {}", report.file_name);
    println!("File Size: {:.2} KB", report.size_kb);
    println!("Preview the head of the table");
    print!("{}", report.preview);

    if let Some(removed) = report.duplicates_removed {
        println!("Successfully removed duplicates ({removed} rows).");
    }
    if let Some(fill) = &report.fill {
        println!("Successfully filled missing values ({} cells).", fill.filled_cells());
        for column in &fill.filled {
            println!("  {}: {} cells filled with {}", column.column, column.cells, column.mean);
        }
    }
    for notice in &report.notices {
        println!("Note: {notice}");
    }
    if let Some(chart) = &report.chart {
        println!("Data Visualization");
        print!("{}", chart.render_text(config.chart_rows, config.chart_width));
    }
    println!("Columns: {}", render_columns(&report.table));
}
