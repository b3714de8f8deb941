// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Cloudlet offload.
//!
//! [`RemoteStrategy`] times a round trip over a [`CloudletChannel`]. The
//! shipped [`LoopbackChannel`] runs the transform in-process, so the
//! strategy behaves like a cloudlet with zero network cost. A real client
//! only has to implement the channel trait.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::FilterStrategy;
use crate::codec::Codec;
use crate::error::{BenchError, BenchResult};
use crate::filters::FilterKind;
use crate::types::{JpegQuality, RemoteEndpoint};

/// Transport to a cloudlet.
#[async_trait]
pub trait CloudletChannel: Send + Sync + std::fmt::Debug {
    fn endpoint(&self) -> &RemoteEndpoint;

    /// Ship `encoded` to the cloudlet and wait for the filtered image.
    async fn transform(&mut self, filter: FilterKind, encoded: Vec<u8>) -> BenchResult<Vec<u8>>;

    /// Tear the transport down.
    async fn close(self: Box<Self>) -> BenchResult<()>;
}

/// In-process stand-in for a cloudlet connection.
#[derive(Debug)]
pub struct LoopbackChannel {
    endpoint: RemoteEndpoint,
    codec: Arc<dyn Codec>,
    quality: JpegQuality,
    requests: u64,
}

impl LoopbackChannel {
    pub fn new(endpoint: RemoteEndpoint, codec: Arc<dyn Codec>, quality: JpegQuality) -> Self {
        tracing::debug!(endpoint = %endpoint, "Opening loopback cloudlet channel");
        Self {
            endpoint,
            codec,
            quality,
            requests: 0,
        }
    }

    /// Requests served so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

#[async_trait]
impl CloudletChannel for LoopbackChannel {
    fn endpoint(&self) -> &RemoteEndpoint {
        &self.endpoint
    }

    async fn transform(&mut self, filter: FilterKind, encoded: Vec<u8>) -> BenchResult<Vec<u8>> {
        let codec = Arc::clone(&self.codec);
        let quality = self.quality;
        let output = tokio::task::spawn_blocking(move || {
            let buffer = codec.decode(&encoded)?;
            codec.encode(&filter.apply(buffer)?, quality)
        })
        .await??;
        self.requests += 1;
        Ok(output)
    }

    async fn close(self: Box<Self>) -> BenchResult<()> {
        tracing::debug!(
            endpoint = %self.endpoint,
            requests = self.requests,
            "Closing loopback cloudlet channel"
        );
        Ok(())
    }
}

/// Strategy that offloads to a cloudlet.
///
/// `offload_time_ms` is the full round trip of the last request.
#[derive(Debug)]
pub struct RemoteStrategy {
    name: String,
    filter: FilterKind,
    channel: Box<dyn CloudletChannel>,
    last_offload: Duration,
}

impl RemoteStrategy {
    pub fn new(
        name: impl Into<String>,
        filter: FilterKind,
        channel: Box<dyn CloudletChannel>,
    ) -> Self {
        Self {
            name: name.into(),
            filter,
            channel,
            last_offload: Duration::ZERO,
        }
    }

    pub fn endpoint(&self) -> &RemoteEndpoint {
        self.channel.endpoint()
    }
}

#[async_trait]
impl FilterStrategy for RemoteStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self, encoded: Vec<u8>) -> BenchResult<Vec<u8>> {
        let start = Instant::now();
        let output = self
            .channel
            .transform(self.filter, encoded)
            .await
            .map_err(|e| match e {
                BenchError::Worker { reason } => BenchError::Worker {
                    reason: format!("cloudlet {}: {}", self.channel.endpoint(), reason),
                },
                other => other,
            })?;
        self.last_offload = start.elapsed();

        tracing::debug!(
            endpoint = %self.channel.endpoint(),
            filter = %self.filter,
            offload_ms = self.last_offload.as_millis() as u64,
            "Cloudlet round trip"
        );
        Ok(output)
    }

    fn offload_time_ms(&self) -> u64 {
        self.last_offload.as_millis() as u64
    }

    async fn close_channel(self: Box<Self>) -> BenchResult<()> {
        self.channel.close().await
    }
}
