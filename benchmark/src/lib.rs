// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! BenchImage Benchmark Analysis
//!
//! Turns the rows of a benchmark sweep into per-size statistics and renders
//! them as CSV, JSON or a plain table.
//!
//! # Criterion Benches
//!
//! - **filters**: grayscale, sepia, convolution and cartoonizer per size
//! - **pipeline**: a full single-filter task through the local and cloudlet
//!   strategies

pub mod metrics;
pub mod reporter;

pub use metrics::{LatencyMetrics, SizeSummary, SweepSummary, SystemInfo};
pub use reporter::{render_csv, render_json, render_table, ReporterError};
