//! Feature preparation: time-of-day derivation and location one-hot encoding
//!
//! Turns the raw sensor frame into the design matrix the fitter consumes.
//! Column order of the result is fully determined by the input: original
//! measurement columns first, then `hour`, then one indicator column per
//! location in sorted order.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;
use std::collections::BTreeSet;

use super::error::PipelineError;
use super::regression::column_to_f64;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const LOCATION_COLUMN: &str = "location_id";
pub const TARGET_COLUMN: &str = "stress_level";
pub const HOUR_COLUMN: &str = "hour";
pub const DATE_COLUMN: &str = "date";

/// Formats tried, in order, for timestamps that are not RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Design matrix, aligned target and the encoding metadata used to build them
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Feature columns in design-matrix order
    pub features: DataFrame,
    /// `stress_level` values, row-aligned with `features`
    pub target: Vec<f64>,
    /// Location labels in indicator-column order
    pub location_categories: Vec<String>,
    /// First and last calendar day covered by the timestamps
    pub observation_window: Option<(NaiveDate, NaiveDate)>,
}

impl FeatureSet {
    pub fn feature_names(&self) -> Vec<String> {
        self.features
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.features.height()
    }
}

/// Build the feature table and target vector from a raw sensor frame.
///
/// # Errors
/// * `MissingColumn` - `timestamp`, `location_id` or `stress_level` is absent
/// * `InvalidTimestamp` - a timestamp is null or unparseable
/// * `NonNumericFeature` / `MissingValues` - the target cannot be read as numbers
pub fn prepare_features(raw: &DataFrame) -> Result<FeatureSet> {
    require_columns(raw, &[TIMESTAMP_COLUMN, LOCATION_COLUMN, TARGET_COLUMN])?;

    let timestamps = parse_timestamp_column(raw.column(TIMESTAMP_COLUMN)?)?;

    let hours: Vec<i32> = timestamps.iter().map(|ts| ts.hour() as i32).collect();

    // The calendar day is only used to report the covered window
    let dates: Vec<NaiveDate> = timestamps.iter().map(|ts| ts.date()).collect();
    let observation_window = dates.iter().min().copied().zip(dates.iter().max().copied());

    let mut df = raw.clone();
    df.with_column(Column::new(HOUR_COLUMN.into(), hours))
        .context("Failed to add hour column")?;
    let df = df.drop_many([TIMESTAMP_COLUMN, DATE_COLUMN]);

    let (mut df, location_categories) = one_hot_encode(&df, LOCATION_COLUMN)?;

    let target = column_to_f64(df.column(TARGET_COLUMN)?)
        .with_context(|| format!("Invalid target column '{}'", TARGET_COLUMN))?;
    df.drop_in_place(TARGET_COLUMN)?;
    let features = df;

    tracing::debug!(
        rows = features.height(),
        features = features.width(),
        locations = location_categories.len(),
        "features prepared"
    );

    Ok(FeatureSet {
        features,
        target,
        location_categories,
        observation_window,
    })
}

/// Replace a categorical column with one boolean indicator column per category.
///
/// Indicator columns are named `<column>_<label>` and appended after the
/// remaining columns. Categories are discovered from the data and sorted:
/// numerically for numeric columns, lexicographically otherwise. Rows with a
/// null category get `false` in every indicator.
///
/// Returns the encoded frame and the category labels in column order.
pub fn one_hot_encode(df: &DataFrame, column: &str) -> Result<(DataFrame, Vec<String>)> {
    let source = df
        .column(column)
        .map_err(|_| missing_column(df, column))?;

    let labels = category_labels(source)?;
    let categories = sorted_categories(&labels, source.dtype());

    let mut encoded = df.drop(column)?;
    for category in &categories {
        let indicator: Vec<bool> = labels
            .iter()
            .map(|label| label.as_deref() == Some(category.as_str()))
            .collect();
        encoded
            .with_column(Column::new(format!("{}_{}", column, category).into(), indicator))
            .with_context(|| format!("Failed to add indicator for '{}'", category))?;
    }

    Ok((encoded, categories))
}

/// Parse a single timestamp string.
///
/// Accepts ISO-like date-times with a space or `T` separator, RFC 3339 (the
/// offset is dropped, wall time kept), US-style `MM/DD/YYYY` date-times, and
/// bare dates, which are read as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn parse_timestamp_column(column: &Column) -> Result<Vec<NaiveDateTime>> {
    let text = column
        .cast(&DataType::String)
        .with_context(|| format!("Failed to read '{}' as text", TIMESTAMP_COLUMN))?;
    let values = text.str()?;

    let mut parsed = Vec::with_capacity(values.len());
    for (row, value) in values.iter().enumerate() {
        let ts = value
            .and_then(parse_timestamp)
            .ok_or_else(|| PipelineError::InvalidTimestamp {
                row,
                value: value.unwrap_or("<null>").to_string(),
            })?;
        parsed.push(ts);
    }

    Ok(parsed)
}

/// Per-row category label, `None` for nulls
fn category_labels(column: &Column) -> Result<Vec<Option<String>>> {
    let dtype = column.dtype();

    if dtype.is_integer() {
        let cast = column.cast(&DataType::Int64)?;
        let labels: Vec<Option<String>> = cast
            .i64()?
            .iter()
            .map(|v| v.map(|n| n.to_string()))
            .collect();
        return Ok(labels);
    }

    if dtype.is_float() {
        let cast = column.cast(&DataType::Float64)?;
        let labels: Vec<Option<String>> = cast
            .f64()?
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()).map(|x| format!("{:?}", x)))
            .collect();
        return Ok(labels);
    }

    let cast = column.cast(&DataType::String)?;
    let labels: Vec<Option<String>> = cast
        .str()?
        .iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(labels)
}

fn sorted_categories(labels: &[Option<String>], dtype: &DataType) -> Vec<String> {
    let mut categories: Vec<String> = labels
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if dtype.is_primitive_numeric() {
        categories.sort_by(|a, b| {
            let x = a.parse::<f64>().unwrap_or(f64::NAN);
            let y = b.parse::<f64>().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        });
    }

    categories
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), PipelineError> {
    match required
        .iter()
        .find(|name| df.column(name).is_err())
    {
        Some(name) => Err(missing_column(df, name)),
        None => Ok(()),
    }
}

fn missing_column(df: &DataFrame, column: &str) -> PipelineError {
    PipelineError::MissingColumn {
        column: column.to_string(),
        available: df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}
