//! Dataset loader for delimited sensor files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use super::error::PipelineError;

/// Field separator of the sensor export format
pub const FIELD_SEPARATOR: char = ',';

/// Load a delimited dataset into a DataFrame.
///
/// Whitespace surrounding each separator is stripped before polars sees the
/// data, so `a , b ,c` and `a,b,c` load identically. Rows with a field count
/// that differs from the header are rejected rather than padded.
///
/// # Arguments
/// * `path` - Path to the delimited text file
/// * `infer_schema_length` - Rows used for type inference (`None` scans the whole file)
pub fn load_dataset(path: &Path, infer_schema_length: Option<usize>) -> Result<DataFrame> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    let normalized = normalize_delimited(&raw, FIELD_SEPARATOR)
        .with_context(|| format!("Failed to parse dataset file: {}", path.display()))?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .into_reader_with_file_handle(Cursor::new(normalized.into_bytes()))
        .finish()
        .with_context(|| format!("Failed to load CSV file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        cols = df.width(),
        "dataset loaded"
    );

    Ok(df)
}

/// Read only the header of a delimited file and return its column names
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset file: {}", path.display()))?;

    let header = raw
        .trim_start_matches('\u{feff}')
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(PipelineError::EmptyDataset)?;

    let fields = split_fields(header, FIELD_SEPARATOR)
        .ok_or(PipelineError::UnterminatedQuote { line: 1 })?;

    Ok(fields
        .into_iter()
        .map(|name| name.trim_matches('"').to_string())
        .collect())
}

/// Strip whitespace around separators and validate the field count of every row.
///
/// Blank lines between records are skipped. A quoted field may span several
/// lines; the record is then joined before it is split. Line numbers in errors
/// are 1-based, refer to the original text and point at the first line of the
/// offending record. A header with no data rows is an empty dataset.
pub fn normalize_delimited(raw: &str, separator: char) -> Result<String, PipelineError> {
    let raw = raw.trim_start_matches('\u{feff}');
    let joiner = separator.to_string();
    let mut out = String::with_capacity(raw.len());
    let mut expected: Option<usize> = None;
    let mut data_rows = 0usize;

    let mut record = String::new();
    let mut record_start = 0usize;

    for (idx, line) in raw.lines().enumerate() {
        let line_no = idx + 1;
        if record.is_empty() {
            if line.trim().is_empty() {
                continue;
            }
            record_start = line_no;
        } else {
            record.push('\n');
        }
        record.push_str(line);

        // Quote still open: the record continues on the next line
        let Some(fields) = split_fields(&record, separator) else {
            continue;
        };

        match expected {
            None => expected = Some(fields.len()),
            Some(n) if n != fields.len() => {
                return Err(PipelineError::MalformedRow {
                    line: record_start,
                    expected: n,
                    found: fields.len(),
                });
            }
            Some(_) => data_rows += 1,
        }

        out.push_str(&fields.join(&joiner));
        out.push('\n');
        record.clear();
    }

    if !record.is_empty() {
        return Err(PipelineError::UnterminatedQuote { line: record_start });
    }
    if expected.is_none() || data_rows == 0 {
        return Err(PipelineError::EmptyDataset);
    }

    Ok(out)
}

/// Split a line on `separator`, ignoring separators inside double quotes.
/// Returns `None` when a quote is left open.
fn split_fields(line: &str, separator: char) -> Option<Vec<&str>> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, ch) in line.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == separator && !in_quotes {
            fields.push(line[start..i].trim());
            start = i + ch.len_utf8();
        }
    }

    if in_quotes {
        return None;
    }

    fields.push(line[start..].trim());
    Some(fields)
}
