// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Rendering of sweep rows and summaries.
//!
//! Everything renders into a caller-supplied writer; nothing is persisted
//! here.

use std::io::Write;

use benchimage_core::BenchmarkReport;
use thiserror::Error;

use crate::metrics::SweepSummary;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to write report: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Write the sweep rows as CSV, header first.
pub fn render_csv<W: Write>(report: &BenchmarkReport, mut writer: W) -> Result<(), ReporterError> {
    writer.write_all(report.to_csv().as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write a summary as pretty JSON.
pub fn render_json<W: Write>(summary: &SweepSummary, mut writer: W) -> Result<(), ReporterError> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a short human-readable table, one line per size.
pub fn render_table<W: Write>(summary: &SweepSummary, mut writer: W) -> Result<(), ReporterError> {
    writeln!(
        writer,
        "{:<7} {:>6} {:>10} {:>10} {:>10} {:>12}",
        "Size", "Rounds", "Median", "p95", "Max", "Offload p50"
    )?;
    for s in &summary.sizes {
        writeln!(
            writer,
            "{:<7} {:>6} {:>8}ms {:>8}ms {:>8}ms {:>10}ms",
            s.size.label(),
            s.rounds,
            s.total.median_ms,
            s.total.p95_ms,
            s.total.max_ms,
            s.offload.median_ms
        )?;
    }
    writeln!(writer, "Total: {}ms", summary.total_time_ms)?;
    if summary.failed_rounds > 0 {
        writeln!(writer, "Failed rounds: {}", summary.failed_rounds)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::SystemInfo;
    use benchimage_core::{BenchmarkRow, SizeLabel};

    fn report() -> BenchmarkReport {
        BenchmarkReport {
            rows: vec![
                BenchmarkRow {
                    round: 1,
                    method: "Cloudlet".to_string(),
                    size: SizeLabel::Mp1,
                    offload_time_ms: 5,
                    total_time_ms: 20,
                },
                BenchmarkRow {
                    round: 2,
                    method: "Cloudlet".to_string(),
                    size: SizeLabel::Mp1,
                    offload_time_ms: 6,
                    total_time_ms: 22,
                },
            ],
            ..Default::default()
        }
    }

    fn system() -> SystemInfo {
        SystemInfo {
            os: "TestOS".to_string(),
            os_version: "1".to_string(),
            kernel_version: Some("6.1".to_string()),
            cpu_model: "Test CPU".to_string(),
            cpu_cores: 2,
            memory_bytes: 1024,
            hostname: "h".to_string(),
        }
    }

    #[test]
    fn test_csv_matches_core_rendering() {
        let report = report();
        let mut out = Vec::new();
        render_csv(&report, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), report.to_csv());
    }

    #[test]
    fn test_json_summary() {
        let summary = SweepSummary::with_system(&report(), system());
        let mut out = Vec::new();
        render_json(&summary, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["sizes"][0]["size"], "1MP");
        assert_eq!(value["sizes"][0]["rounds"], 2);
        assert_eq!(value["total_time_ms"], 42);
        assert_eq!(value["system"]["hostname"], "h");
    }

    #[test]
    fn test_table_lists_sizes() {
        let summary = SweepSummary::with_system(&report(), system());
        let mut out = Vec::new();
        render_table(&summary, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("1MP"));
        assert!(text.contains("Total: 42ms"));
    }
}
