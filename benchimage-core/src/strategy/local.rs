// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! In-process strategy.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::FilterStrategy;
use crate::codec::Codec;
use crate::error::BenchResult;
use crate::filters::FilterKind;
use crate::types::JpegQuality;

/// Decodes, filters and re-encodes on the blocking pool.
///
/// Only the filter call is timed; decode and encode are excluded from
/// [`offload_time_ms`](FilterStrategy::offload_time_ms).
#[derive(Debug)]
pub struct LocalStrategy {
    name: String,
    codec: Arc<dyn Codec>,
    filter: FilterKind,
    quality: JpegQuality,
    last_offload: Duration,
}

impl LocalStrategy {
    pub fn new(name: impl Into<String>, codec: Arc<dyn Codec>, filter: FilterKind) -> Self {
        Self {
            name: name.into(),
            codec,
            filter,
            quality: JpegQuality::OUTPUT,
            last_offload: Duration::ZERO,
        }
    }

    pub fn quality(mut self, quality: JpegQuality) -> Self {
        self.quality = quality;
        self
    }
}

#[async_trait]
impl FilterStrategy for LocalStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&mut self, encoded: Vec<u8>) -> BenchResult<Vec<u8>> {
        let codec = Arc::clone(&self.codec);
        let filter = self.filter;
        let quality = self.quality;

        let (output, elapsed) = tokio::task::spawn_blocking(move || {
            let buffer = codec.decode(&encoded)?;
            let start = Instant::now();
            let filtered = filter.apply(buffer)?;
            let elapsed = start.elapsed();
            Ok::<_, crate::error::BenchError>((codec.encode(&filtered, quality)?, elapsed))
        })
        .await??;

        tracing::debug!(
            strategy = %self.name,
            filter = %filter,
            offload_ms = elapsed.as_millis() as u64,
            "Local filter applied"
        );

        self.last_offload = elapsed;
        Ok(output)
    }

    fn offload_time_ms(&self) -> u64 {
        self.last_offload.as_millis() as u64
    }

    async fn close_channel(self: Box<Self>) -> BenchResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawCodec;
    use crate::error::BenchError;
    use crate::pixel::{pack_color, PixelBuffer};

    #[tokio::test]
    async fn test_local_grayscale() {
        let src = PixelBuffer::filled(4, 4, pack_color(255, 0, 0)).unwrap();
        let bytes = RawCodec.encode(&src, JpegQuality::SOURCE).unwrap();

        let mut strategy = LocalStrategy::new("Normal", Arc::new(RawCodec), FilterKind::GreyScale);
        let out = strategy.apply(bytes).await.unwrap();
        let decoded = RawCodec.decode(&out).unwrap();
        assert!(decoded.as_slice().iter().all(|&c| c == 0x4C4C4C));
        assert_eq!(strategy.name(), "Normal");

        Box::new(strategy).close_channel().await.unwrap();
    }

    #[tokio::test]
    async fn test_local_decode_failure() {
        let mut strategy = LocalStrategy::new("Normal", Arc::new(RawCodec), FilterKind::Sepia);
        let err = strategy.apply(vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, BenchError::Decode { .. }));
        assert_eq!(strategy.offload_time_ms(), 0);
    }
}
