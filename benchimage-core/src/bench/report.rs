// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Rows and aggregate produced by a benchmark sweep.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::task::ResultRecord;
use crate::types::SizeLabel;

/// Column header of [`BenchmarkReport::to_csv`].
pub const CSV_HEADER: &str = "Round,Method,PhotoSize,TimeCelProc,TimeCelTotal";

/// One timed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    /// 1-based within its size.
    pub round: u32,
    /// Strategy key the round ran through.
    pub method: String,
    pub size: SizeLabel,
    pub offload_time_ms: u64,
    pub total_time_ms: u64,
}

/// A round that failed under [`SweepPolicy::SkipFailed`](crate::types::SweepPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFailure {
    pub size: SizeLabel,
    pub round: u32,
    pub error: String,
}

/// Everything a sweep produced, rows in size-major, round-minor order.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkReport {
    pub rows: Vec<BenchmarkRow>,
    pub failures: Vec<RoundFailure>,
    /// Result of the last successful round.
    pub last: Option<ResultRecord>,
}

impl BenchmarkReport {
    /// Sum of every row's total.
    pub fn total_time_ms(&self) -> u64 {
        self.rows.iter().map(|r| r.total_time_ms).sum()
    }

    /// Rows measured at `size`, in round order.
    pub fn rows_for(&self, size: SizeLabel) -> impl Iterator<Item = &BenchmarkRow> + '_ {
        self.rows.iter().filter(move |r| r.size == size)
    }

    /// The last produced image with the sweep total as its elapsed time.
    /// `None` if no round produced an image.
    pub fn aggregate(&self) -> Option<ResultRecord> {
        self.last.clone().map(|mut record| {
            record.total_time_ms = self.total_time_ms();
            record
        })
    }

    /// Rows as CSV, header first.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(CSV_HEADER.len() + 1 + self.rows.len() * 32);
        out.push_str(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            // Writing into a String cannot fail.
            let _ = writeln!(
                out,
                "{},{},{},{},{}",
                row.round, row.method, row.size, row.offload_time_ms, row.total_time_ms
            );
        }
        out
    }
}
