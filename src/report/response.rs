//! Response shaping for the invocation boundary

use anyhow::{Context, Result};
use serde::{Serialize, Serializer};

use crate::pipeline::{CorrelationScope, RankedCoefficients};

/// JSON body returned on a successful invocation.
///
/// `top_stress_features` carries names only; the coefficient values live in
/// `correlations`, whose keys keep the ranked order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightResponse {
    pub top_stress_features: Vec<String>,
    #[serde(serialize_with = "serialize_ordered_map")]
    pub correlations: Vec<(String, f64)>,
}

impl InsightResponse {
    pub fn from_ranking(ranked: &RankedCoefficients, scope: CorrelationScope) -> Self {
        Self {
            top_stress_features: ranked.top_feature_names(),
            correlations: ranked
                .correlation_mapping(scope)
                .iter()
                .map(|c| (c.feature.clone(), c.coefficient))
                .collect(),
        }
    }

    pub fn correlation(&self, feature: &str) -> Option<f64> {
        self.correlations
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, coef)| *coef)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize insight response to JSON")
    }
}

fn serialize_ordered_map<S: Serializer>(
    pairs: &[(String, f64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(name, coef)| (name, coef)))
}
