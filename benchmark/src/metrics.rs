// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Summary statistics over benchmark sweep rows.
//!
//! Timings in a sweep are whole milliseconds, so every statistic here is in
//! milliseconds too.

use std::collections::BTreeSet;

use benchimage_core::{BenchmarkReport, SizeLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Distribution of one timing column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyMetrics {
    pub min_ms: u64,
    pub max_ms: u64,
    pub mean_ms: f64,
    /// p50
    pub median_ms: u64,
    pub p95_ms: u64,
    pub std_dev_ms: f64,
}

impl LatencyMetrics {
    /// Calculate metrics from samples. Empty input yields all zeros.
    pub fn from_samples(mut samples: Vec<u64>) -> Self {
        if samples.is_empty() {
            return Self {
                min_ms: 0,
                max_ms: 0,
                mean_ms: 0.0,
                median_ms: 0,
                p95_ms: 0,
                std_dev_ms: 0.0,
            };
        }

        samples.sort_unstable();
        let len = samples.len();

        let sum: u64 = samples.iter().sum();
        let mean_ms = sum as f64 / len as f64;
        let variance = samples
            .iter()
            .map(|&x| {
                let diff = x as f64 - mean_ms;
                diff * diff
            })
            .sum::<f64>()
            / len as f64;

        Self {
            min_ms: samples[0],
            max_ms: samples[len - 1],
            mean_ms,
            median_ms: samples[len / 2],
            p95_ms: samples[((len as f64 * 0.95) as usize).min(len - 1)],
            std_dev_ms: variance.sqrt(),
        }
    }
}

/// Statistics for one size of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeSummary {
    pub size: SizeLabel,
    pub rounds: usize,
    pub total: LatencyMetrics,
    pub offload: LatencyMetrics,
}

impl SizeSummary {
    /// Summarize the rows of `report` measured at `size`.
    pub fn from_report(report: &BenchmarkReport, size: SizeLabel) -> Self {
        let (totals, offloads): (Vec<u64>, Vec<u64>) = report
            .rows_for(size)
            .map(|r| (r.total_time_ms, r.offload_time_ms))
            .unzip();
        Self {
            size,
            rounds: totals.len(),
            total: LatencyMetrics::from_samples(totals),
            offload: LatencyMetrics::from_samples(offloads),
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total memory in bytes.
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Whole-sweep summary with the host it ran on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    /// Strategy key of the rows.
    pub method: Option<String>,
    pub sizes: Vec<SizeSummary>,
    pub failed_rounds: usize,
    pub total_time_ms: u64,
}

impl SweepSummary {
    /// Summarize every size present in `report`, in sweep order.
    pub fn from_report(report: &BenchmarkReport) -> Self {
        Self::with_system(report, SystemInfo::collect())
    }

    /// Same as [`from_report`](Self::from_report) with a given host description.
    pub fn with_system(report: &BenchmarkReport, system: SystemInfo) -> Self {
        // SizeLabel order is sweep order.
        let seen: BTreeSet<SizeLabel> = report.rows.iter().map(|r| r.size).collect();

        Self {
            timestamp: Utc::now(),
            system,
            method: report.rows.first().map(|r| r.method.clone()),
            sizes: seen
                .into_iter()
                .map(|size| SizeSummary::from_report(report, size))
                .collect(),
            failed_rounds: report.failures.len(),
            total_time_ms: report.total_time_ms(),
        }
    }

    pub fn size(&self, size: SizeLabel) -> Option<&SizeSummary> {
        self.sizes.iter().find(|s| s.size == size)
    }
}
