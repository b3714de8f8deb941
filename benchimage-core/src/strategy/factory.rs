// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Strategy lookup by key.

use std::fmt;
use std::sync::Arc;

use super::{CloudletChannel, FilterStrategy, LocalStrategy, LoopbackChannel, RemoteStrategy};
use crate::codec::Codec;
use crate::config::{LOCAL_STRATEGY_KEY, REMOTE_STRATEGY_KEY};
use crate::filters::FilterKind;
use crate::types::{JpegQuality, RemoteEndpoint, StrategyMode};

/// Opens a channel to a cloudlet endpoint that encodes at the given quality.
pub type ChannelConnector =
    Arc<dyn Fn(&RemoteEndpoint, JpegQuality) -> Box<dyn CloudletChannel> + Send + Sync>;

/// Builds strategies for one filter from string keys.
///
/// Unknown keys yield `None`; turning that into `StrategyUnavailable` is the
/// caller's decision.
#[derive(Clone)]
pub struct StrategyFactory {
    codec: Arc<dyn Codec>,
    filter: FilterKind,
    quality: JpegQuality,
    connector: ChannelConnector,
}

impl StrategyFactory {
    /// Factory whose cloudlet channels are in-process loopbacks.
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        let loopback_codec = Arc::clone(&codec);
        let connector: ChannelConnector =
            Arc::new(move |endpoint: &RemoteEndpoint, quality: JpegQuality| {
                Box::new(LoopbackChannel::new(
                    endpoint.clone(),
                    Arc::clone(&loopback_codec),
                    quality,
                )) as Box<dyn CloudletChannel>
            });
        Self {
            codec,
            filter: FilterKind::default(),
            quality: JpegQuality::OUTPUT,
            connector,
        }
    }

    pub fn filter(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    pub fn quality(mut self, quality: JpegQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Replace how cloudlet channels are opened.
    pub fn connector(mut self, connector: ChannelConnector) -> Self {
        self.connector = connector;
        self
    }

    /// In-process strategy for `key`.
    pub fn local_method(&self, key: &str) -> Option<Box<dyn FilterStrategy>> {
        if key != LOCAL_STRATEGY_KEY {
            return None;
        }
        Some(Box::new(
            LocalStrategy::new(key, Arc::clone(&self.codec), self.filter).quality(self.quality),
        ))
    }

    /// Cloudlet strategy for `key`, connected to `endpoint`.
    pub fn remote_method(
        &self,
        key: &str,
        endpoint: &RemoteEndpoint,
    ) -> Option<Box<dyn FilterStrategy>> {
        if key != REMOTE_STRATEGY_KEY {
            return None;
        }
        let channel = (self.connector)(endpoint, self.quality);
        Some(Box::new(RemoteStrategy::new(key, self.filter, channel)))
    }

    /// Resolve `key` through the lookup for `mode`. Remote mode without an
    /// endpoint resolves to nothing.
    pub fn create(
        &self,
        mode: StrategyMode,
        key: &str,
        endpoint: Option<&RemoteEndpoint>,
    ) -> Option<Box<dyn FilterStrategy>> {
        match mode {
            StrategyMode::Local => self.local_method(key),
            StrategyMode::Remote => endpoint.and_then(|ep| self.remote_method(key, ep)),
        }
    }
}

impl fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("codec", &self.codec.name())
            .field("filter", &self.filter)
            .field("quality", &self.quality)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::RawCodec;

    fn factory() -> StrategyFactory {
        StrategyFactory::new(Arc::new(RawCodec))
    }

    #[test]
    fn test_known_keys() {
        let endpoint: RemoteEndpoint = "cloudlet.local:9000".parse().unwrap();
        let local = factory().local_method("Normal").unwrap();
        assert_eq!(local.name(), "Normal");
        let remote = factory().remote_method("Cloudlet", &endpoint).unwrap();
        assert_eq!(remote.name(), "Cloudlet");
    }

    #[test]
    fn test_unknown_keys_yield_none() {
        let endpoint: RemoteEndpoint = "10.0.0.1".parse().unwrap();
        assert!(factory().local_method("Turbo").is_none());
        assert!(factory().local_method("Cloudlet").is_none());
        assert!(factory().remote_method("Normal", &endpoint).is_none());
        assert!(factory().create(StrategyMode::Local, "", None).is_none());
    }

    #[test]
    fn test_create_routes_by_mode() {
        let endpoint: RemoteEndpoint = "10.0.0.1".parse().unwrap();
        let f = factory();
        assert!(f.create(StrategyMode::Local, "Normal", None).is_some());
        assert!(f.create(StrategyMode::Remote, "Cloudlet", Some(&endpoint)).is_some());
        assert!(f.create(StrategyMode::Remote, "Cloudlet", None).is_none());
    }
}
