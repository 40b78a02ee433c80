//! Error types for the insight pipeline.
//!
//! Pipeline functions return `anyhow::Result` so context can be layered on as
//! errors travel up, but every domain failure originates as a `PipelineError`
//! and can be recovered with `downcast_ref` by callers and tests.

use thiserror::Error;

/// Failures raised while loading, preparing, or fitting a dataset.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// A column the pipeline depends on is absent from the dataset.
    #[error("Required column '{column}' not found in dataset. Available columns: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A timestamp value could not be parsed into a date-time.
    #[error("Unparseable timestamp '{value}' at row {row}")]
    InvalidTimestamp { row: usize, value: String },

    /// A data row does not have the same number of fields as the header.
    #[error("Malformed row at line {line}: expected {expected} field(s), found {found}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A delimited line has a quote that is never closed.
    #[error("Malformed row at line {line}: unterminated quoted field")]
    UnterminatedQuote { line: usize },

    /// A column feeding the regression has null or NaN entries.
    #[error("Column '{column}' contains {count} missing value(s)")]
    MissingValues { column: String, count: usize },

    /// A feature column cannot be used as a regressor.
    #[error("Feature column '{column}' has non-numeric type {dtype}")]
    NonNumericFeature { column: String, dtype: String },

    /// Feature rows and target values are not aligned.
    #[error("Row count mismatch: {features} feature row(s) vs {target} target value(s)")]
    RowCountMismatch { features: usize, target: usize },

    /// The dataset has no data rows.
    #[error("Dataset contains no rows")]
    EmptyDataset,

    /// Nothing is left to regress on after preparation.
    #[error("Dataset contains no feature columns")]
    NoFeatures,

    /// More free parameters than observations.
    #[error("Under-determined system: {rows} row(s) for {columns} informative feature column(s)")]
    Underdetermined { rows: usize, columns: usize },
}
