//! Coefficient ranking by absolute magnitude

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of features reported by default
pub const DEFAULT_TOP_N: usize = 3;

/// Which coefficients populate the `correlations` mapping of a response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationScope {
    /// Only the top-ranked features, mirroring the ranked list
    #[default]
    TopRanked,
    /// Every fitted coefficient, in ranked order
    AllFeatures,
}

impl fmt::Display for CorrelationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationScope::TopRanked => write!(f, "top_ranked"),
            CorrelationScope::AllFeatures => write!(f, "all_features"),
        }
    }
}

/// A single feature with its fitted coefficient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCoefficient {
    pub feature: String,
    pub coefficient: f64,
}

/// All coefficients sorted by descending magnitude, with a top-N cut
#[derive(Debug, Clone)]
pub struct RankedCoefficients {
    ranked: Vec<RankedCoefficient>,
    top_n: usize,
}

impl RankedCoefficients {
    /// The top-N entries (fewer if the model has fewer features)
    pub fn top(&self) -> &[RankedCoefficient] {
        &self.ranked[..self.top_n.min(self.ranked.len())]
    }

    /// Every coefficient in ranked order
    pub fn all(&self) -> &[RankedCoefficient] {
        &self.ranked
    }

    pub fn top_feature_names(&self) -> Vec<String> {
        self.top().iter().map(|c| c.feature.clone()).collect()
    }

    /// Entries backing the `correlations` mapping for the given scope
    pub fn correlation_mapping(&self, scope: CorrelationScope) -> &[RankedCoefficient] {
        match scope {
            CorrelationScope::TopRanked => self.top(),
            CorrelationScope::AllFeatures => self.all(),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

/// Rank feature coefficients by absolute value, largest first.
///
/// The sort is stable, so equal magnitudes keep their design-matrix order.
/// NaN coefficients rank below every finite value.
pub fn rank_coefficients(pairs: &[(String, f64)], top_n: usize) -> RankedCoefficients {
    let mut ranked: Vec<RankedCoefficient> = pairs
        .iter()
        .map(|(feature, coefficient)| RankedCoefficient {
            feature: feature.clone(),
            coefficient: *coefficient,
        })
        .collect();

    ranked.sort_by(|a, b| magnitude(b.coefficient).total_cmp(&magnitude(a.coefficient)));

    RankedCoefficients { ranked, top_n }
}

fn magnitude(coefficient: f64) -> f64 {
    if coefficient.is_nan() {
        f64::NEG_INFINITY
    } else {
        coefficient.abs()
    }
}
