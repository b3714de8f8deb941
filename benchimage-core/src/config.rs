// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Filter request configuration and its YAML loader.
//!
//! Raw YAML is parsed into plain strings and numbers first, then validated
//! into typed fields. Any invalid field fails the load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult, ValidationError};
use crate::types::{
    FilterName, ImageId, Iterations, JpegQuality, RemoteEndpoint, SizeLabel, StrategyMode,
    SweepPolicy,
};

/// Factory key of the local strategy.
pub const LOCAL_STRATEGY_KEY: &str = "Normal";
/// Factory key of the cloudlet strategy.
pub const REMOTE_STRATEGY_KEY: &str = "Cloudlet";

/// Raw request as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawFilterConfiguration {
    image: String,
    #[serde(default = "default_filter")]
    filter: String,
    #[serde(default = "default_size")]
    size: String,
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default)]
    benchmark: bool,
    #[serde(default)]
    strategy_key: Option<String>,
    #[serde(default)]
    cloudlet: Option<String>,
    #[serde(default = "default_iterations")]
    iterations: u32,
    #[serde(default = "default_source_quality")]
    source_quality: u8,
    #[serde(default = "default_output_quality")]
    output_quality: u8,
    #[serde(default)]
    sweep_policy: SweepPolicy,
}

fn default_filter() -> String {
    "Cartoonizer".to_string()
}

fn default_size() -> String {
    "8MP".to_string()
}

fn default_mode() -> String {
    "Local".to_string()
}

fn default_iterations() -> u32 {
    crate::types::DEFAULT_ITERATIONS
}

fn default_source_quality() -> u8 {
    JpegQuality::SOURCE.get()
}

fn default_output_quality() -> u8 {
    JpegQuality::OUTPUT.get()
}

/// Validated filter request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfiguration {
    pub image: ImageId,
    pub filter: FilterName,
    pub size: SizeLabel,
    pub mode: StrategyMode,
    pub benchmark: bool,
    /// Key handed to the strategy factory.
    pub strategy_key: String,
    pub remote: Option<RemoteEndpoint>,
    pub iterations: Iterations,
    pub source_quality: JpegQuality,
    pub output_quality: JpegQuality,
    pub sweep_policy: SweepPolicy,
}

impl FilterConfiguration {
    /// Local, non-benchmark request with default settings.
    pub fn new(image: ImageId, filter: FilterName, size: SizeLabel) -> Self {
        Self {
            image,
            filter,
            size,
            mode: StrategyMode::Local,
            benchmark: filter == FilterName::Benchmark,
            strategy_key: LOCAL_STRATEGY_KEY.to_string(),
            remote: None,
            iterations: Iterations::default(),
            source_quality: JpegQuality::SOURCE,
            output_quality: JpegQuality::OUTPUT,
            sweep_policy: SweepPolicy::default(),
        }
    }

    /// Route the request to a cloudlet.
    pub fn remote(mut self, endpoint: RemoteEndpoint) -> Self {
        self.mode = StrategyMode::Remote;
        self.strategy_key = REMOTE_STRATEGY_KEY.to_string();
        self.remote = Some(endpoint);
        self
    }

    pub fn benchmark(mut self, enabled: bool) -> Self {
        self.benchmark = enabled;
        self
    }

    pub fn iterations(mut self, iterations: Iterations) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn strategy_key(mut self, key: impl Into<String>) -> Self {
        self.strategy_key = key.into();
        self
    }

    pub fn sweep_policy(mut self, policy: SweepPolicy) -> Self {
        self.sweep_policy = policy;
        self
    }

    /// Whether the request runs a sweep rather than a single pass.
    pub fn is_benchmark(&self) -> bool {
        self.benchmark || self.filter == FilterName::Benchmark
    }

    /// Sizes a benchmark visits, in order.
    pub fn sweep_sizes(&self) -> Vec<SizeLabel> {
        self.size.sweep()
    }

    /// Same request pinned to one size, as run by a single benchmark round.
    pub fn at_size(&self, size: SizeLabel) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a request from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<FilterConfiguration> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate a request from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<FilterConfiguration> {
        let raw: RawFilterConfiguration =
            serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawFilterConfiguration) -> Result<FilterConfiguration, ValidationError> {
        let image = ImageId::new(raw.image)?;
        let filter: FilterName = raw.filter.parse()?;
        let size: SizeLabel = raw.size.parse()?;
        let mode: StrategyMode = raw.mode.parse()?;
        let remote = raw
            .cloudlet
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<RemoteEndpoint>())
            .transpose()?;

        if mode == StrategyMode::Remote && remote.is_none() {
            return Err(ValidationError::InvalidFieldValue {
                field: "cloudlet",
                value: String::new(),
                reason: "remote mode requires a cloudlet address".to_string(),
            });
        }

        let strategy_key = raw.strategy_key.unwrap_or_else(|| {
            match mode {
                StrategyMode::Local => LOCAL_STRATEGY_KEY,
                StrategyMode::Remote => REMOTE_STRATEGY_KEY,
            }
            .to_string()
        });

        Ok(FilterConfiguration {
            image,
            filter,
            size,
            mode,
            benchmark: raw.benchmark,
            strategy_key,
            remote,
            iterations: Iterations::new(raw.iterations)?,
            source_quality: JpegQuality::new(raw.source_quality)?,
            output_quality: JpegQuality::new(raw.output_quality)?,
            sweep_policy: raw.sweep_policy,
        })
    }
}
