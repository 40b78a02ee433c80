//! Insight report export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::insights::{InsightConfig, InsightReport};
use crate::pipeline::RankedCoefficient;
use crate::report::InsightResponse;

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// StressInsight version
    pub stressinsight_version: String,
    /// Input file path
    pub input_file: String,
    /// Number of features reported in the ranking
    pub top_n: usize,
    /// Scope of the `correlations` mapping
    pub correlation_scope: String,
    /// First calendar day in the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_start: Option<String>,
    /// Last calendar day in the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_end: Option<String>,
    /// Location labels, in indicator-column order
    pub location_categories: Vec<String>,
}

/// Fit diagnostics that the handler response does not expose
#[derive(Serialize)]
pub struct ModelDiagnostics {
    pub rows: usize,
    pub features: usize,
    pub rank: usize,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Complete insight export
#[derive(Serialize)]
pub struct InsightReportExport<'a> {
    pub metadata: ReportMetadata,
    pub diagnostics: ModelDiagnostics,
    /// Every fitted coefficient in ranked order
    pub coefficients: &'a [RankedCoefficient],
    /// Exactly what the handler would return as its body
    pub response: &'a InsightResponse,
}

impl<'a> InsightReportExport<'a> {
    pub fn new(report: &'a InsightReport, config: &InsightConfig) -> Self {
        let (observation_start, observation_end) = match report.observation_window {
            Some((start, end)) => (Some(start.to_string()), Some(end.to_string())),
            None => (None, None),
        };

        Self {
            metadata: ReportMetadata {
                timestamp: Utc::now().to_rfc3339(),
                stressinsight_version: env!("CARGO_PKG_VERSION").to_string(),
                input_file: config.dataset_path.display().to_string(),
                top_n: config.top_n,
                correlation_scope: config.correlation_scope.to_string(),
                observation_start,
                observation_end,
                location_categories: report.location_categories.clone(),
            },
            diagnostics: ModelDiagnostics {
                rows: report.model.n_samples(),
                features: report.feature_count(),
                rank: report.model.rank(),
                intercept: report.model.intercept(),
                r_squared: report.model.r_squared(),
            },
            coefficients: report.ranking.all(),
            response: &report.response,
        }
    }
}

/// Export an insight report to a JSON file with run metadata
///
/// # Arguments
/// * `report` - Result of a completed pipeline run
/// * `config` - Configuration the run used
/// * `output_path` - Path to write the JSON file
pub fn export_insight_report(
    report: &InsightReport,
    config: &InsightConfig,
    output_path: &Path,
) -> Result<()> {
    let export = InsightReportExport::new(report, config);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize insight report to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write insight report to {}", output_path.display()))?;

    Ok(())
}
