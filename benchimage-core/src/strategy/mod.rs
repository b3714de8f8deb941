// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Filter strategies: where a transform runs (in-process or on a cloudlet).
//!
//! A strategy takes encoded bytes and returns encoded bytes, so callers never
//! know whether pixels left the process.

pub mod factory;
pub mod local;
pub mod remote;

use async_trait::async_trait;

pub use factory::{ChannelConnector, StrategyFactory};
pub use local::LocalStrategy;
pub use remote::{CloudletChannel, LoopbackChannel, RemoteStrategy};

use crate::error::BenchResult;

/// Runs one filter over an encoded image.
#[async_trait]
pub trait FilterStrategy: Send + Sync + std::fmt::Debug {
    /// Method name recorded in benchmark rows.
    fn name(&self) -> &str;

    /// Transform `encoded` and return the encoded result.
    async fn apply(&mut self, encoded: Vec<u8>) -> BenchResult<Vec<u8>>;

    /// Time attributed to the transform itself by the last `apply`.
    fn offload_time_ms(&self) -> u64;

    /// Release whatever the strategy holds. Consumes the strategy, so it
    /// can only happen once.
    async fn close_channel(self: Box<Self>) -> BenchResult<()>;
}
