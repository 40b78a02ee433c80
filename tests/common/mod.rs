//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// True coefficients used by `synthetic_sensor_csv`
pub const HEART_RATE_COEF: f64 = 0.5;
pub const NOISE_DB_COEF: f64 = 2.0;
pub const TEMP_COEF: f64 = -1.0;
pub const INTERCEPT: f64 = 3.0;

/// Small hand-written sensor file with three locations
pub const SMALL_SENSOR_CSV: &str = "\
timestamp,location_id,heart_rate,noise_db,stress_level
2024-03-01 08:00:00,L2,72,40.5,2.1
2024-03-01 09:30:00,L1,80,55.0,3.4
2024-03-01 13:15:00,L3,65,38.2,1.8
2024-03-02 10:00:00,L1,90,60.1,4.0
2024-03-02 18:45:00,L2,77,47.3,2.9
2024-03-03 07:05:00,L3,70,42.0,2.2
2024-03-03 21:40:00,L1,85,58.8,3.7
2024-03-04 12:00:00,L2,68,44.1,2.4
";

/// Write `contents` to a file inside a fresh temporary directory
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Write a sensor CSV to a temporary directory
pub fn create_temp_csv(contents: &str) -> (TempDir, PathBuf) {
    write_temp_file("sensor_data.csv", contents)
}

/// Generate a sensor CSV whose stress level is a known linear function.
///
/// `stress = 3 + 0.5·heart_rate + 2·noise_db − 1·temp + ε`, with |ε| ≤ 0.01.
/// Hour and location carry no signal.
pub fn synthetic_sensor_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let locations = ["A", "B", "C"];

    let mut csv = String::from("timestamp,location_id,heart_rate,noise_db,temp,stress_level\n");
    for _ in 0..rows {
        let day = rng.gen_range(1..=28);
        let hour = rng.gen_range(0..24);
        let minute = rng.gen_range(0..60);
        let location = locations[rng.gen_range(0..locations.len())];
        let heart_rate: f64 = rng.gen_range(55.0..110.0);
        let noise_db: f64 = rng.gen_range(30.0..80.0);
        let temp: f64 = rng.gen_range(18.0..30.0);
        let noise: f64 = rng.gen_range(-0.01..0.01);
        let stress = INTERCEPT + HEART_RATE_COEF * heart_rate + NOISE_DB_COEF * noise_db
            + TEMP_COEF * temp
            + noise;

        csv.push_str(&format!(
            "2024-03-{:02} {:02}:{:02}:00,{},{:.6},{:.6},{:.6},{:.6}\n",
            day, hour, minute, location, heart_rate, noise_db, temp, stress
        ));
    }
    csv
}

/// Same content as `csv` with random spaces around every separator
pub fn pad_separators(csv: &str) -> String {
    csv.lines()
        .enumerate()
        .map(|(i, line)| {
            let pad = if i % 2 == 0 { " , " } else { ",  " };
            format!("  {}\t", line.replace(',', pad))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame has exactly these columns, in order
pub fn assert_column_order(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    assert_eq!(actual_cols, expected_cols, "Column order mismatch");
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
