//! # Data Cleaner
//!
//! Cleaning and conversion of tabular data files (CSV and Excel).
//!
//! ## Features
//!
//! - **Multi-format input**: CSV (`.csv`) and Excel workbooks (`.xlsx`, `.xls`, first worksheet)
//! - **Type inference**: Bool, BigInt, Double, Varchar, Timestamp, Date and Time columns
//! - **Cleaning**: duplicate row removal and mean imputation of numeric columns
//! - **Projection**: keep an ordered subset of columns
//! - **Visualization**: bar chart of the numeric columns
//! - **Conversion**: re-export as CSV or as a single-sheet `.xlsx` workbook
//!
//! ## Usage
//!
//! A [`Plan`] lists the commands to apply. [`FilePipeline::render`] runs it over
//! every [`UploadedFile`] and returns one outcome per file, in upload order.
//!
//! ```no_run
//! use data_cleaner::{FilePipeline, FileSettings, Format, Plan, UploadedFile};
//!
//! let file = UploadedFile::new("sales.csv", std::fs::read("sales.csv").unwrap());
//! let plan = Plan::from(FileSettings {
//!     remove_duplicates: true,
//!     convert: Some(Format::Excel),
//!     ..FileSettings::default()
//! });
//! for outcome in FilePipeline::default().render(&[file], &plan) {
//!     println!("{}: {}", outcome.file_name, outcome.result.is_ok());
//! }
//! ```
pub mod chart;
pub mod config;
pub mod convert;
pub mod error;
mod helpers;
pub mod pipeline;
pub mod spreadsheet;
pub mod table;

pub use crate::chart::ChartSpec;
pub use crate::config::PipelineConfig;
pub use crate::convert::ConvertedFile;
pub use crate::convert::Format;
pub use crate::error::DataCleanerError;
pub use crate::error::ErrorKind;
pub use crate::pipeline::Command;
pub use crate::pipeline::FileOutcome;
pub use crate::pipeline::FilePipeline;
pub use crate::pipeline::FileReport;
pub use crate::pipeline::FileSettings;
pub use crate::pipeline::Notice;
pub use crate::pipeline::Plan;
pub use crate::pipeline::UploadedFile;
pub use crate::table::Table;
