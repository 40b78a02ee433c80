//! End-to-end insight generation: one dataset read, one fit, one ranking

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

use crate::pipeline::{
    fit_linear_regression, load_dataset, prepare_features, rank_coefficients, CorrelationScope,
    FeatureSet, LinearModel, RankedCoefficients, DEFAULT_TOP_N,
};
use crate::report::InsightResponse;

/// Dataset location used when the caller does not provide one
pub const DEFAULT_DATASET_PATH: &str = "./university_mental_health_iot_dataset.csv";

/// Settings for a single insight invocation
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    pub dataset_path: PathBuf,
    pub top_n: usize,
    pub correlation_scope: CorrelationScope,
    /// Rows used for CSV type inference; `None` scans the whole file
    pub infer_schema_length: Option<usize>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            top_n: DEFAULT_TOP_N,
            correlation_scope: CorrelationScope::default(),
            infer_schema_length: None,
        }
    }
}

impl InsightConfig {
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            ..Default::default()
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_correlation_scope(mut self, scope: CorrelationScope) -> Self {
        self.correlation_scope = scope;
        self
    }

    pub fn with_infer_schema_length(mut self, length: Option<usize>) -> Self {
        self.infer_schema_length = length;
        self
    }
}

/// Everything one invocation produced, including diagnostics the response omits
#[derive(Debug, Clone)]
pub struct InsightReport {
    pub response: InsightResponse,
    pub model: LinearModel,
    pub ranking: RankedCoefficients,
    pub location_categories: Vec<String>,
    pub observation_window: Option<(NaiveDate, NaiveDate)>,
}

impl InsightReport {
    /// Rank a fitted model and shape its response
    pub fn assemble(features: FeatureSet, model: LinearModel, config: &InsightConfig) -> Self {
        let ranking = rank_coefficients(&model.coefficient_pairs(), config.top_n);
        let response = InsightResponse::from_ranking(&ranking, config.correlation_scope);

        Self {
            response,
            model,
            ranking,
            location_categories: features.location_categories,
            observation_window: features.observation_window,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.model.coefficients().len()
    }
}

/// Run the full pipeline against the configured dataset.
///
/// Nothing is cached: each call re-reads the file and fits a fresh model.
pub fn generate_insights(config: &InsightConfig) -> Result<InsightReport> {
    let raw = load_dataset(&config.dataset_path, config.infer_schema_length)?;
    let features = prepare_features(&raw)?;
    let model = fit_linear_regression(&features.features, &features.target)?;
    Ok(InsightReport::assemble(features, model, config))
}
