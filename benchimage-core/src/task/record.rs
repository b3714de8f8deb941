// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

use crate::config::FilterConfiguration;
use crate::pixel::PixelBuffer;

/// Outcome of a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    /// Produced image, decoded.
    pub image: PixelBuffer,
    /// Wall clock in milliseconds. For a benchmark, the sum over all rounds.
    pub total_time_ms: u64,
    /// Time the strategy attributed to its own transform.
    pub offload_time_ms: u64,
    /// Request that produced the image.
    pub config: FilterConfiguration,
}
