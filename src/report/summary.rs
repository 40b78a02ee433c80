//! Coefficient summary report generation

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::insights::InsightReport;

/// Console summary of a completed insight run
#[derive(Debug)]
pub struct CoefficientSummary<'a> {
    report: &'a InsightReport,
}

impl<'a> CoefficientSummary<'a> {
    pub fn new(report: &'a InsightReport) -> Self {
        Self { report }
    }

    /// Ranked coefficient table; top-N rows are highlighted
    pub fn coefficient_table(&self) -> Table {
        let top_n = self.report.ranking.top().len();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Rank").add_attribute(Attribute::Bold),
            Cell::new("Feature").add_attribute(Attribute::Bold),
            Cell::new("Coefficient").add_attribute(Attribute::Bold),
        ]);

        for (idx, entry) in self.report.ranking.all().iter().enumerate() {
            let is_top = idx < top_n;
            let color = if !is_top {
                Color::White
            } else if entry.coefficient >= 0.0 {
                Color::Red
            } else {
                Color::Green
            };

            let mut feature = Cell::new(&entry.feature);
            if is_top {
                feature = feature.add_attribute(Attribute::Bold);
            }

            table.add_row(vec![
                Cell::new(idx + 1).set_alignment(CellAlignment::Right),
                feature,
                Cell::new(format!("{:+.6}", entry.coefficient))
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        table
    }

    /// Model fit statistics
    pub fn model_table(&self) -> Table {
        let model = &self.report.model;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows"), Cell::new(model.n_samples())]);
        table.add_row(vec![
            Cell::new("🧮 Features"),
            Cell::new(self.report.feature_count()),
        ]);
        table.add_row(vec![
            Cell::new("📍 Locations"),
            Cell::new(self.report.location_categories.len()),
        ]);
        table.add_row(vec![
            Cell::new("🔢 Rank"),
            Cell::new(model.rank()).fg(if model.is_rank_deficient() {
                Color::Yellow
            } else {
                Color::White
            }),
        ]);
        table.add_row(vec![
            Cell::new("➕ Intercept"),
            Cell::new(format!("{:.6}", model.intercept())),
        ]);

        let color = if model.r_squared() > 0.5 {
            Color::Green
        } else if model.r_squared() > 0.1 {
            Color::Yellow
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new("📈 R²"),
            Cell::new(format!("{:.4}", model.r_squared()))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("MODEL SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.model_table().to_string().lines() {
            println!("    {}", line);
        }

        println!();
        println!(
            "    {} {}",
            style("🎯").cyan(),
            style("STRESS DRIVERS").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.coefficient_table().to_string().lines() {
            println!("    {}", line);
        }

        println!();
        println!(
            "      {} {}",
            style("Top features:").yellow(),
            self.top_features_line()
        );
    }

    /// Top features with the coefficient reported for each, if any
    pub fn top_features_line(&self) -> String {
        let response = &self.report.response;
        response
            .top_stress_features
            .iter()
            .map(|name| match response.correlation(name) {
                Some(coef) => format!("{} ({:+.4})", name, coef),
                None => name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
