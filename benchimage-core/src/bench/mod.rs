// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark sweep over image sizes.
//!
//! The harness owns ordering, progress text and failure policy. What a round
//! actually does is behind [`RoundRunner`], so the sweep can be driven with
//! fixed timings.

pub mod report;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub use report::{BenchmarkReport, BenchmarkRow, RoundFailure, CSV_HEADER};

use crate::error::{BenchError, BenchResult};
use crate::progress::ProgressHandle;
use crate::task::ResultRecord;
use crate::types::{Iterations, SizeLabel, SweepPolicy};

/// Runs one single-filter round at a given size.
#[async_trait]
pub trait RoundRunner: Send + Sync {
    async fn run_round(&self, size: SizeLabel) -> BenchResult<ResultRecord>;
}

/// Sweep configuration.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    iterations: Iterations,
    policy: SweepPolicy,
    cancel: CancellationToken,
}

impl BenchmarkHarness {
    /// Create a harness with default settings (50 rounds, abort on error).
    pub fn new() -> Self {
        Self {
            iterations: Iterations::default(),
            policy: SweepPolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Set the number of rounds per size.
    pub fn iterations(mut self, iterations: Iterations) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set what a failed round does to the sweep.
    pub fn policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Stop between rounds once `token` is cancelled.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run `iterations` rounds for every size in order.
    ///
    /// Each successful round appends a row and emits
    /// `"Benchmark Image {size} [{round}/{iterations}]"`. A cancelled token
    /// ends the sweep with `Cancelled` whatever the policy.
    pub async fn run<R>(
        &self,
        sizes: &[SizeLabel],
        method: &str,
        runner: &R,
        progress: &ProgressHandle,
    ) -> BenchResult<BenchmarkReport>
    where
        R: RoundRunner + ?Sized,
    {
        let iterations = self.iterations.get();
        let planned = sizes.len() as u64 * iterations as u64;
        let mut report = BenchmarkReport {
            rows: Vec::with_capacity(planned as usize),
            ..Default::default()
        };
        let mut done = 0u64;

        for &size in sizes {
            for round in 1..=iterations {
                if self.cancel.is_cancelled() {
                    tracing::info!(size = %size, round, "Benchmark cancelled");
                    return Err(BenchError::Cancelled);
                }

                match runner.run_round(size).await {
                    Ok(record) => {
                        report.rows.push(BenchmarkRow {
                            round,
                            method: method.to_string(),
                            size,
                            offload_time_ms: record.offload_time_ms,
                            total_time_ms: record.total_time_ms,
                        });
                        progress.emit(
                            percent(done + 1, planned),
                            format!("Benchmark Image {} [{}/{}]", size, round, iterations),
                            Some(format!("{}ms", record.total_time_ms)),
                        );
                        report.last = Some(record);
                    }
                    Err(BenchError::Cancelled) => return Err(BenchError::Cancelled),
                    Err(e) => match self.policy {
                        SweepPolicy::AbortOnError => {
                            tracing::warn!(
                                size = %size,
                                round,
                                error = %e,
                                "Benchmark round failed, aborting sweep"
                            );
                            return Err(e);
                        }
                        SweepPolicy::SkipFailed => {
                            tracing::warn!(
                                size = %size,
                                round,
                                error = %e,
                                "Benchmark round failed, skipping"
                            );
                            report.failures.push(RoundFailure {
                                size,
                                round,
                                error: e.to_string(),
                            });
                        }
                    },
                }
                done += 1;
            }
        }

        tracing::info!(
            rows = report.rows.len(),
            failures = report.failures.len(),
            total_ms = report.total_time_ms(),
            "Benchmark sweep finished"
        );
        Ok(report)
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(done: u64, planned: u64) -> u8 {
    if planned == 0 {
        100
    } else {
        (done * 100 / planned).min(100) as u8
    }
}
