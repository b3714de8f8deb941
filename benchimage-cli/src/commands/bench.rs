// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `benchimage bench` command - size sweep.

use benchimage_benchmark::{render_csv, render_json, render_table, SweepSummary};
use benchimage_core::{FilterName, Iterations, SizeLabel, SweepPolicy};

use super::request::{run_with_progress, RequestArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per round
    Csv,
    /// Per-size statistics with host information
    Json,
    /// Per-size statistics as a table
    Table,
}

pub async fn execute(
    request: &RequestArgs,
    iterations: Option<u32>,
    skip_failed: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut config = request
        .configuration(FilterName::GreyScale, SizeLabel::All)?
        .benchmark(true);
    if let Some(rounds) = iterations {
        config = config.iterations(Iterations::new(rounds)?);
    }
    if skip_failed {
        config = config.sweep_policy(SweepPolicy::SkipFailed);
    }

    tracing::info!(
        image = %config.image,
        filter = %config.filter,
        size = %config.size,
        strategy = %config.strategy_key,
        iterations = config.iterations.get(),
        "Starting benchmark"
    );

    let output = run_with_progress(config, request.asset_source()).await?;
    let report = output.report.unwrap_or_default();

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Csv => render_csv(&report, stdout.lock())?,
        OutputFormat::Json => render_json(&SweepSummary::from_report(&report), stdout.lock())?,
        OutputFormat::Table => render_table(&SweepSummary::from_report(&report), stdout.lock())?,
    }

    for failure in &report.failures {
        eprintln!(
            "Round {} at {} failed: {}",
            failure.round, failure.size, failure.error
        );
    }
    tracing::info!(
        total_ms = output.record.total_time_ms,
        rows = report.rows.len(),
        "Benchmark finished"
    );

    Ok(())
}
