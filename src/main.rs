//! StressInsight CLI
//!
//! Runs the stress-driver pipeline locally, either as a styled step-by-step
//! report or as the raw handler envelope (`--json`).

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use stressinsight::cli::Cli;
use stressinsight::pipeline::{fit_linear_regression, load_dataset, prepare_features};
use stressinsight::report::{export_insight_report, CoefficientSummary};
use stressinsight::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
};
use stressinsight::{lambda_handler, InsightReport};

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.insight_config();

    // Handler mode - behave exactly like a gateway invocation
    if cli.json {
        let response = lambda_handler(&Value::Null, &Value::Null, &config);
        println!("{}", serde_json::to_string_pretty(&response)?);
        if !response.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let raw = load_dataset(&config.dataset_path, config.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = raw.shape();
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    print_step_time(step_start.elapsed());

    // Step 2: Feature preparation
    print_step_header(2, "Feature Preparation");

    let step_start = Instant::now();
    let spinner = create_spinner("Deriving hour and encoding locations...");
    let features = prepare_features(&raw)?;
    finish_with_success(&spinner, "Features prepared");

    print_count(
        "location(s)",
        features.location_categories.len(),
        Some(&format!("({})", features.location_categories.join(", "))),
    );
    println!(
        "      Design matrix: {} rows × {} features",
        style(features.n_rows()).yellow(),
        style(features.features.width()).yellow()
    );
    if let Some((start, end)) = features.observation_window {
        print_info(&format!("Observations span {} to {}", start, end));
    }
    print_step_time(step_start.elapsed());

    // Step 3: Model fitting
    print_step_header(3, "Linear Regression");

    let step_start = Instant::now();
    let spinner = create_spinner("Fitting ordinary least squares...");
    let model = fit_linear_regression(&features.features, &features.target)?;
    if model.is_rank_deficient() {
        finish_with_warning(
            &spinner,
            &format!(
                "Collinear design (rank {} of {}), using minimum-norm solution",
                model.rank(),
                model.coefficients().len()
            ),
        );
    } else {
        finish_with_success(&spinner, "Model fitted");
    }
    print_step_time(step_start.elapsed());

    // Step 4: Ranking
    print_step_header(4, "Rank Coefficients");

    let step_start = Instant::now();
    let report = InsightReport::assemble(features, model, &config);
    print_success(&format!(
        "Ranked {} coefficient(s)",
        report.ranking.all().len()
    ));
    print_step_time(step_start.elapsed());

    CoefficientSummary::new(&report).display();

    if let Some(export_path) = &cli.export {
        let spinner = create_spinner("Writing insight report...");
        export_insight_report(&report, &config, export_path)?;
        finish_with_success(
            &spinner,
            &format!("Report saved to {}", export_path.display()),
        );
    }

    println!();
    println!("    {}", style("Response body:").dim());
    println!("    {}", report.response.to_json()?);

    print_completion();

    Ok(())
}
