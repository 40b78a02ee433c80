//! StressInsight: Stress Driver Library
//!
//! Fits an ordinary least squares model of `stress_level` on sensor readings
//! and reports the features with the largest coefficients.

pub mod cli;
pub mod handler;
pub mod insights;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use handler::{lambda_handler, HandlerResponse};
pub use insights::{generate_insights, InsightConfig, InsightReport, DEFAULT_DATASET_PATH};
