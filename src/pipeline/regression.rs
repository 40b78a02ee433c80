//! Ordinary least squares fitting of the stress target

use anyhow::{ensure, Context, Result};
use faer::Mat;
use polars::prelude::*;

use super::error::PipelineError;

/// A fitted linear model `y ≈ Xβ + intercept`.
///
/// Coefficients are aligned with the feature columns of the design matrix
/// the model was fitted on.
#[derive(Debug, Clone)]
pub struct LinearModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
    r_squared: f64,
    n_samples: usize,
    rank: usize,
}

impl LinearModel {
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coefficient of determination on the training data
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Numerical rank of the centered design matrix.
    /// Lower than the feature count when columns are collinear.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.coefficients.len()
    }

    /// Look up the coefficient of a single feature
    pub fn coefficient(&self, feature: &str) -> Option<f64> {
        self.feature_names
            .iter()
            .position(|name| name == feature)
            .map(|idx| self.coefficients[idx])
    }

    /// Feature/coefficient pairs in design-matrix column order
    pub fn coefficient_pairs(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.coefficients.iter().copied())
            .collect()
    }

    /// Predict the target for one row of feature values
    pub fn predict(&self, row: &[f64]) -> Result<f64> {
        ensure!(
            row.len() == self.coefficients.len(),
            "Expected {} feature value(s), got {}",
            self.coefficients.len(),
            row.len()
        );
        Ok(self.intercept + dot(row, &self.coefficients))
    }
}

/// Fit OLS of `target` on every column of `features`.
///
/// Both sides are centered, which absorbs the intercept, and the centered
/// system is solved with a thin SVD pseudo-inverse. A rank-deficient design
/// (for example a full set of one-hot columns next to the intercept) yields
/// the minimum-norm solution instead of an error.
///
/// # Errors
/// * `RowCountMismatch` - `features.height() != target.len()`
/// * `EmptyDataset` / `NoFeatures` - nothing to fit
/// * `Underdetermined` - fewer rows than non-constant feature columns
/// * `NonNumericFeature` / `MissingValues` - column cannot enter the design matrix
pub fn fit_linear_regression(features: &DataFrame, target: &[f64]) -> Result<LinearModel> {
    let n_rows = features.height();

    if n_rows != target.len() {
        return Err(PipelineError::RowCountMismatch {
            features: n_rows,
            target: target.len(),
        }
        .into());
    }
    if n_rows == 0 {
        return Err(PipelineError::EmptyDataset.into());
    }
    if features.width() == 0 {
        return Err(PipelineError::NoFeatures.into());
    }

    let missing_target = target.iter().filter(|v| v.is_nan()).count();
    if missing_target > 0 {
        return Err(PipelineError::MissingValues {
            column: "target".to_string(),
            count: missing_target,
        }
        .into());
    }

    let mut feature_names = Vec::with_capacity(features.width());
    let mut columns = Vec::with_capacity(features.width());
    for column in features.get_columns() {
        feature_names.push(column.name().to_string());
        columns.push(column_to_f64(column)?);
    }

    let informative = columns.iter().filter(|values| !is_constant(values)).count();
    if n_rows < informative {
        return Err(PipelineError::Underdetermined {
            rows: n_rows,
            columns: informative,
        }
        .into());
    }

    let x_means: Vec<f64> = columns.iter().map(|values| mean(values)).collect();
    let y_mean = mean(target);

    let mut x = Mat::<f64>::zeros(n_rows, columns.len());
    for (col_idx, (values, &col_mean)) in columns.iter().zip(x_means.iter()).enumerate() {
        for (row_idx, &val) in values.iter().enumerate() {
            x[(row_idx, col_idx)] = val - col_mean;
        }
    }
    let y_centered: Vec<f64> = target.iter().map(|y| y - y_mean).collect();

    let (coefficients, rank) = min_norm_least_squares(&x, &y_centered);
    let intercept = y_mean - dot(&x_means, &coefficients);

    let mut model = LinearModel {
        feature_names,
        coefficients,
        intercept,
        r_squared: 0.0,
        n_samples: n_rows,
        rank,
    };
    model.r_squared = coefficient_of_determination(&model, &columns, target)?;

    tracing::debug!(
        rows = n_rows,
        features = model.coefficients.len(),
        rank,
        r_squared = model.r_squared,
        "linear model fitted"
    );

    Ok(model)
}

/// Cast a numeric or boolean column to f64 values, rejecting nulls and NaN
pub fn column_to_f64(column: &Column) -> Result<Vec<f64>> {
    let name = column.name().to_string();
    let dtype = column.dtype();

    if !(dtype.is_primitive_numeric() || *dtype == DataType::Boolean) {
        return Err(PipelineError::NonNumericFeature {
            column: name,
            dtype: dtype.to_string(),
        }
        .into());
    }

    let float_col = column
        .cast(&DataType::Float64)
        .with_context(|| format!("Failed to cast column '{}' to Float64", name))?;
    let ca = float_col.f64()?;

    let missing = ca.iter().filter(|v| v.map_or(true, f64::is_nan)).count();
    if missing > 0 {
        return Err(PipelineError::MissingValues {
            column: name,
            count: missing,
        }
        .into());
    }

    let values: Vec<f64> = ca.iter().flatten().collect();
    Ok(values)
}

/// Minimum-norm solution of `x β = y` via thin SVD.
///
/// Singular values at or below `max(n, p) · ε · σ_max` are treated as zero.
/// Returns the coefficients and the number of singular values kept.
fn min_norm_least_squares(x: &Mat<f64>, y: &[f64]) -> (Vec<f64>, usize) {
    let (n_rows, n_cols) = (x.nrows(), x.ncols());
    let svd = x.thin_svd();
    let u = svd.u();
    let v = svd.v();
    let s = svd.s_diagonal();

    let k = s.nrows();
    let sigma_max = (0..k).map(|i| s[i]).fold(0.0_f64, f64::max);
    let cutoff = n_rows.max(n_cols) as f64 * f64::EPSILON * sigma_max;

    let mut beta = vec![0.0; n_cols];
    let mut rank = 0;

    for i in 0..k {
        let sigma = s[i];
        if sigma <= cutoff || sigma == 0.0 {
            continue;
        }
        rank += 1;

        let projection: f64 = (0..n_rows).map(|r| u[(r, i)] * y[r]).sum();
        let scale = projection / sigma;
        for (j, b) in beta.iter_mut().enumerate() {
            *b += scale * v[(j, i)];
        }
    }

    (beta, rank)
}

/// R² of the fitted model on its training data.
/// A constant target scores 1.0 when fitted exactly and 0.0 otherwise.
fn coefficient_of_determination(
    model: &LinearModel,
    columns: &[Vec<f64>],
    target: &[f64],
) -> Result<f64> {
    let y_mean = mean(target);
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut row = vec![0.0; columns.len()];

    for (row_idx, &y) in target.iter().enumerate() {
        for (slot, values) in row.iter_mut().zip(columns.iter()) {
            *slot = values[row_idx];
        }
        let predicted = model.predict(&row)?;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };
    Ok(r_squared)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
