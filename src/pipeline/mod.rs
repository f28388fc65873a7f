//! # Pipeline Module
//!
//! Runs a [`Plan`] of commands over uploaded files. Every run is a pure function
//! of the files and the plan: each file is parsed, summarized, cleaned, projected,
//! charted and converted in that order, and yields its own [`FileOutcome`].
//! A failing file never stops the files after it.
pub mod preview;

use crate::chart::visualize;
use crate::chart::ChartSpec;
use crate::config::PipelineConfig;
use crate::convert::convert;
use crate::convert::ConvertedFile;
use crate::convert::Format;
use crate::error::DataCleanerError;
use crate::error::ResultMessage;
use crate::pipeline::preview::render_grid;
use crate::spreadsheet::FileFormat;
use crate::table::clean::FillReport;
use crate::table::Table;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// A named byte blob handed to the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        UploadedFile {
            name: name.into(),
            data,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn size_kb(&self) -> f64 {
        self.data.len() as f64 / 1024.0
    }

    /// Lower-cased last extension of the file name including the dot, or an
    /// empty string. Leading dots of the base name do not start an extension.
    pub fn extension(&self) -> String {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or_default();
        let stem = base.trim_start_matches('.');
        match stem.rfind('.') {
            Some(index) => stem[index..].to_lowercase(),
            None => String::new(),
        }
    }
}

/// One step of a plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RemoveDuplicates,
    FillMissingNumeric,
    /// Keep exactly these columns, in this order
    SelectColumns(Vec<String>),
    Visualize,
    Convert(Format),
}

impl Command {
    fn is_cleaning(&self) -> bool {
        matches!(self, Command::RemoveDuplicates | Command::FillMissingNumeric)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::RemoveDuplicates => write!(f, "remove duplicates"),
            Command::FillMissingNumeric => write!(f, "fill missing values"),
            Command::SelectColumns(columns) => write!(f, "select columns [{}]", columns.join(", ")),
            Command::Visualize => write!(f, "visualize"),
            Command::Convert(format) => write!(f, "convert to {format}"),
        }
    }
}

/// Errors in the order of plan commands.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Cannot {command} after selecting columns")]
    CleaningAfterSelection { command: String },
}

/// Validated, ordered list of commands applied to every file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    commands: Vec<Command>,
}

impl Plan {
    /// Creates a plan, checking that no cleaning command follows a column selection.
    pub fn new(commands: Vec<Command>) -> Result<Self, PlanError> {
        let mut selected = false;
        for command in &commands {
            if selected && command.is_cleaning() {
                return Err(PlanError::CleaningAfterSelection {
                    command: command.to_string(),
                });
            }
            selected |= matches!(command, Command::SelectColumns(_));
        }
        Ok(Plan { commands })
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

/// The choices offered for each file, one per control.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub remove_duplicates: bool,
    pub fill_missing: bool,
    /// Columns to keep; `None` keeps all columns
    pub columns: Option<Vec<String>>,
    pub chart: bool,
    pub convert: Option<Format>,
}

impl From<FileSettings> for Plan {
    /// Canonical order: dedupe, fill, select, visualize, convert.
    fn from(settings: FileSettings) -> Self {
        let mut commands = Vec::new();
        if settings.remove_duplicates {
            commands.push(Command::RemoveDuplicates);
        }
        if settings.fill_missing {
            commands.push(Command::FillMissingNumeric);
        }
        if let Some(columns) = settings.columns {
            commands.push(Command::SelectColumns(columns));
        }
        if settings.chart {
            commands.push(Command::Visualize);
        }
        if let Some(format) = settings.convert {
            commands.push(Command::Convert(format));
        }
        Plan { commands }
    }
}

/// Something worth telling the user that is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A numeric column had no values, so there was no mean to fill it with
    EmptyNumericColumn { column: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::EmptyNumericColumn { column } => {
                write!(f, "Column '{column}' has no values, missing cells were left empty")
            }
        }
    }
}

/// Everything shown for one successfully processed file.
#[derive(Debug)]
pub struct FileReport {
    pub file_name: String,
    pub size_kb: f64,
    /// Head of the table as parsed, before any command
    pub preview: String,
    /// Rows dropped by `RemoveDuplicates`, if it ran
    pub duplicates_removed: Option<usize>,
    /// Result of `FillMissingNumeric`, if it ran
    pub fill: Option<FillReport>,
    pub notices: Vec<Notice>,
    pub chart: Option<ChartSpec>,
    pub converted: Option<ConvertedFile>,
    /// The table after all commands
    pub table: Table,
}

/// Result of running the plan over one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub file_name: String,
    pub result: Result<FileReport, DataCleanerError>,
}

/// Runs plans over uploaded files.
#[derive(Clone, Debug, Default)]
pub struct FilePipeline {
    pub config: PipelineConfig,
}

impl FilePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        FilePipeline { config }
    }

    /// Parses the file according to its extension.
    pub fn parse(&self, file: &UploadedFile) -> Result<Table, DataCleanerError> {
        let format = FileFormat::from_extension(&file.extension())?;
        Ok(format.read(&file.name, &file.data, &self.config)?)
    }

    /// Runs every command of `plan` over one file.
    /// Errors carry the file name as prefix.
    pub fn run(&self, file: &UploadedFile, plan: &Plan) -> Result<FileReport, DataCleanerError> {
        self.run_commands(file, plan).with_prefix(&file.name)
    }

    fn run_commands(&self, file: &UploadedFile, plan: &Plan) -> Result<FileReport, DataCleanerError> {
        let mut table = self.parse(file)?;
        info!(
            file = %file.name,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed file"
        );

        let preview = render_grid(&table.head(self.config.preview_rows));
        let mut duplicates_removed = None;
        let mut fill = None;
        let mut notices = Vec::new();
        let mut chart = None;
        let mut converted = None;

        for command in plan.commands() {
            debug!(file = %file.name, %command, "running command");
            match command {
                Command::RemoveDuplicates => {
                    *duplicates_removed.get_or_insert(0) += table.remove_duplicates();
                }
                Command::FillMissingNumeric => {
                    let report = table.fill_missing_numeric();
                    for column in &report.empty_columns {
                        warn!(file = %file.name, column = %column, "numeric column has no values to average");
                        notices.push(Notice::EmptyNumericColumn {
                            column: column.to_owned(),
                        });
                    }
                    fill = Some(report);
                }
                Command::SelectColumns(columns) => table.select_columns(columns.as_slice())?,
                Command::Visualize => chart = Some(visualize(&table)),
                Command::Convert(format) => {
                    let output = convert(&table, &file.name, *format)?;
                    info!(file = %file.name, output = %output.file_name, "converted file");
                    converted = Some(output);
                }
            }
        }

        Ok(FileReport {
            file_name: file.name.to_owned(),
            size_kb: file.size_kb(),
            preview,
            duplicates_removed,
            fill,
            notices,
            chart,
            converted,
            table,
        })
    }

    /// Runs `plan` over every file in upload order.
    /// Failures are logged and returned as that file's outcome.
    pub fn render(&self, files: &[UploadedFile], plan: &Plan) -> Vec<FileOutcome> {
        files
            .iter()
            .map(|file| {
                let result = self.run(file, plan);
                if let Err(error) = &result {
                    warn!(file = %file.name, kind = error.kind().as_str(), "{error}");
                }
                FileOutcome {
                    file_name: file.name.to_owned(),
                    result,
                }
            })
            .collect()
    }
}
