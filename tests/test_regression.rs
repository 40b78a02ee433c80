//! Tests for OLS fitting and coefficient ranking on prepared features

use polars::prelude::*;
use stressinsight::pipeline::{
    fit_linear_regression, load_dataset, prepare_features, rank_coefficients, PipelineError,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_recovers_known_coefficients() {
    let (_temp_dir, csv_path) = create_temp_csv(&synthetic_sensor_csv(200, 42));
    let raw = load_dataset(&csv_path, None).unwrap();
    let features = prepare_features(&raw).unwrap();

    let model = fit_linear_regression(&features.features, &features.target).unwrap();

    let tolerance = 1e-2;
    assert!((model.coefficient("heart_rate").unwrap() - HEART_RATE_COEF).abs() < tolerance);
    assert!((model.coefficient("noise_db").unwrap() - NOISE_DB_COEF).abs() < tolerance);
    assert!((model.coefficient("temp").unwrap() - TEMP_COEF).abs() < tolerance);
    assert!(model.coefficient("hour").unwrap().abs() < tolerance);
    assert!(model.r_squared() > 0.9999);
    assert_eq!(model.n_samples(), 200);
}

#[test]
fn test_full_location_encoding_is_rank_deficient_but_finite() {
    let (_temp_dir, csv_path) = create_temp_csv(&synthetic_sensor_csv(100, 5));
    let raw = load_dataset(&csv_path, None).unwrap();
    let features = prepare_features(&raw).unwrap();

    let model = fit_linear_regression(&features.features, &features.target).unwrap();

    // All k indicator columns plus the intercept lose exactly one dimension
    assert_eq!(model.rank(), model.coefficients().len() - 1);
    assert!(model.coefficients().iter().all(|c| c.is_finite()));
    assert!(model.intercept().is_finite());
}

#[test]
fn test_top_three_follow_coefficient_magnitude() {
    let (_temp_dir, csv_path) = create_temp_csv(&synthetic_sensor_csv(150, 9));
    let raw = load_dataset(&csv_path, None).unwrap();
    let features = prepare_features(&raw).unwrap();
    let model = fit_linear_regression(&features.features, &features.target).unwrap();

    let ranked = rank_coefficients(&model.coefficient_pairs(), 3);

    assert_eq!(ranked.top_feature_names(), vec!["noise_db", "temp", "heart_rate"]);
    for pair in ranked.all().windows(2) {
        assert!(pair[0].coefficient.abs() >= pair[1].coefficient.abs());
    }
}

#[test]
fn test_two_row_scenario_fits_exactly() {
    let (_temp_dir, csv_path) = create_temp_csv(
        "timestamp,location_id,temp,stress_level\n\
         2024-01-01 08:00:00,A,10,1\n\
         2024-01-01 09:00:00,A,20,2\n",
    );
    let raw = load_dataset(&csv_path, None).unwrap();
    let features = prepare_features(&raw).unwrap();

    let model = fit_linear_regression(&features.features, &features.target).unwrap();
    let ranked = rank_coefficients(&model.coefficient_pairs(), 3);
    let names = ranked.top_feature_names();

    assert!(names.contains(&"temp".to_string()));
    assert!(names.contains(&"location_id_A".to_string()));
    assert_eq!(names[0], "temp");
    assert!(ranked.top().iter().all(|c| c.coefficient.is_finite()));
    assert!((model.r_squared() - 1.0).abs() < 1e-12);
}

#[test]
fn test_row_count_mismatch() {
    let df = df! { "x" => [1.0, 2.0, 3.0] }.unwrap();

    let err = fit_linear_regression(&df, &[1.0, 2.0]).unwrap_err();

    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::RowCountMismatch {
            features: 3,
            target: 2
        })
    );
}

#[test]
fn test_underdetermined_system() {
    let df = df! {
        "a" => [1.0, 2.0, 3.0],
        "b" => [3.0, 1.0, 2.0],
        "c" => [2.0, 3.0, 1.0],
        "d" => [1.0, 1.0, 2.0],
    }
    .unwrap();

    let err = fit_linear_regression(&df, &[1.0, 2.0, 3.0]).unwrap_err();

    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::Underdetermined {
            rows: 3,
            columns: 4
        })
    );
}

#[test]
fn test_empty_design_matrix() {
    let empty = DataFrame::empty();
    let err = fit_linear_regression(&empty, &[]).unwrap_err();
    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::EmptyDataset)
    );
}

#[test]
fn test_non_numeric_feature_is_rejected() {
    let df = df! {
        "x" => [1.0, 2.0],
        "label" => ["a", "b"],
    }
    .unwrap();

    let err = fit_linear_regression(&df, &[1.0, 2.0]).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::NonNumericFeature { column, .. }) if column == "label"
    ));
}

#[test]
fn test_missing_feature_values_are_rejected() {
    let (_temp_dir, csv_path) = create_temp_csv(
        "timestamp,location_id,temp,stress_level\n\
         2024-01-01 08:00:00,A,10,1\n\
         2024-01-01 09:00:00,A,,2\n\
         2024-01-01 10:00:00,B,30,3\n",
    );
    let raw = load_dataset(&csv_path, None).unwrap();
    let features = prepare_features(&raw).unwrap();

    let err = fit_linear_regression(&features.features, &features.target).unwrap_err();

    assert_eq!(
        err.downcast_ref::<PipelineError>(),
        Some(&PipelineError::MissingValues {
            column: "temp".to_string(),
            count: 1
        })
    );
}
