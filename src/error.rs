use thiserror::Error;

/// Main error type for the data cleaner.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum DataCleanerError {
    #[error("{context}: {source}")]
    WithContextError {
        context: String,
        #[source]
        source: Box<DataCleanerError>,
    },

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    // Internal module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    TableError(#[from] crate::table::TableError),

    #[error("{0}")]
    PlanError(#[from] crate::pipeline::PlanError),
}

/// Coarse classification of a failure, as shown to the user next to the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The file extension is not one of `.csv`, `.xlsx`, `.xls`
    UnsupportedFormat,
    /// The file content could not be parsed into a table
    ParseFailure,
    /// A column selection referenced unknown or repeated columns
    InvalidSelection,
    /// The command order of a plan is not allowed
    InvalidPlan,
    /// Reading or writing bytes failed
    Io,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::InvalidSelection => "invalid selection",
            ErrorKind::InvalidPlan => "invalid plan",
            ErrorKind::Io => "i/o error",
        }
    }
}

impl DataCleanerError {
    /// Classifies the error, looking through any context prefixes.
    pub fn kind(&self) -> ErrorKind {
        use crate::spreadsheet::SpreadsheetError;
        match self {
            DataCleanerError::WithContextError { source, .. } => source.kind(),
            DataCleanerError::IoError(_) | DataCleanerError::ZipError(_) => ErrorKind::Io,
            DataCleanerError::CsvError(error) if error.is_io_error() => ErrorKind::Io,
            DataCleanerError::CsvError(_) => ErrorKind::ParseFailure,
            DataCleanerError::SpreadsheetError(SpreadsheetError::UnsupportedFormat { .. }) => ErrorKind::UnsupportedFormat,
            DataCleanerError::SpreadsheetError(_) => ErrorKind::ParseFailure,
            DataCleanerError::TableError(_) => ErrorKind::InvalidSelection,
            DataCleanerError::PlanError(_) => ErrorKind::InvalidPlan,
        }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, DataCleanerError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| DataCleanerError::WithContextError {
            context: message.to_owned(),
            source: Box::new(e),
        })
    }
}
