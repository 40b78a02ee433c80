//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::insights::{InsightConfig, DEFAULT_DATASET_PATH};
use crate::pipeline::CorrelationScope;

/// StressInsight - Rank the sensor features most associated with stress level
#[derive(Parser, Debug)]
#[command(name = "stressinsight")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input dataset (comma-delimited, whitespace around separators is ignored)
    #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
    pub input: PathBuf,

    /// Number of top-ranked features to report
    #[arg(long, default_value = "3", value_parser = validate_top_n)]
    pub top_n: usize,

    /// Report every fitted coefficient in `correlations` instead of only the top-ranked ones
    #[arg(long, default_value = "false")]
    pub all_coefficients: bool,

    /// Number of rows to use for schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Write a JSON report with metadata, fit diagnostics and all coefficients
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print only the handler response envelope as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Enable debug tracing on stderr
    #[arg(long, default_value = "false")]
    pub debug: bool,
}

impl Cli {
    pub fn correlation_scope(&self) -> CorrelationScope {
        if self.all_coefficients {
            CorrelationScope::AllFeatures
        } else {
            CorrelationScope::TopRanked
        }
    }

    /// Schema inference length, where 0 means a full scan
    pub fn schema_length(&self) -> Option<usize> {
        if self.infer_schema_length == 0 {
            None
        } else {
            Some(self.infer_schema_length)
        }
    }

    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig::new(self.input.clone())
            .with_top_n(self.top_n)
            .with_correlation_scope(self.correlation_scope())
            .with_infer_schema_length(self.schema_length())
    }
}

/// Validator for top_n parameter
fn validate_top_n(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("top_n must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
