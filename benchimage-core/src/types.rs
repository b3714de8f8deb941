// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers and enums for validated request inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Port the cloudlet listens on when the endpoint does not name one.
pub const DEFAULT_CLOUDLET_PORT: u16 = 50051;

/// Rounds per size in a benchmark sweep.
pub const DEFAULT_ITERATIONS: u32 = 50;

const MAX_ITERATIONS: u32 = 10_000;

/// Target image size of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SizeLabel {
    /// Every concrete size, in ascending order (benchmark only).
    All,
    Mp03,
    Mp1,
    Mp2,
    Mp4,
    Mp8,
}

impl SizeLabel {
    /// The concrete sizes in sweep order.
    pub const SWEEP: [SizeLabel; 5] = [
        SizeLabel::Mp03,
        SizeLabel::Mp1,
        SizeLabel::Mp2,
        SizeLabel::Mp4,
        SizeLabel::Mp8,
    ];

    const EXPECTED: &'static str = "All, 0.3MP, 1MP, 2MP, 4MP, 8MP";

    /// Get the display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Mp03 => "0.3MP",
            Self::Mp1 => "1MP",
            Self::Mp2 => "2MP",
            Self::Mp4 => "4MP",
            Self::Mp8 => "8MP",
        }
    }

    /// Expand into the ordered list of sizes a sweep visits.
    pub fn sweep(self) -> Vec<SizeLabel> {
        match self {
            Self::All => Self::SWEEP.to_vec(),
            size => vec![size],
        }
    }

    /// Concrete size used for a single run. `All` has no single image, so it
    /// loads the 1MP variant.
    pub fn concrete(self) -> SizeLabel {
        match self {
            Self::All => Self::Mp1,
            size => size,
        }
    }

    /// Directory holding the assets of this size.
    pub const fn dir_name(&self) -> &'static str {
        match self {
            Self::Mp03 => "0_3mp",
            Self::Mp2 => "2mp",
            Self::Mp4 => "4mp",
            Self::Mp8 => "8mp",
            Self::All | Self::Mp1 => "1mp",
        }
    }

    /// 4:3 pixel dimensions closest to the nominal megapixel count.
    pub const fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Mp03 => (640, 480),
            Self::Mp2 => (1600, 1200),
            Self::Mp4 => (2304, 1728),
            Self::Mp8 => (3264, 2448),
            Self::All | Self::Mp1 => (1152, 864),
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "0.3MP" | "0_3MP" => Ok(Self::Mp03),
            "1MP" => Ok(Self::Mp1),
            "2MP" => Ok(Self::Mp2),
            "4MP" => Ok(Self::Mp4),
            "8MP" => Ok(Self::Mp8),
            _ => Err(ValidationError::UnknownVariant {
                kind: "size",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl TryFrom<String> for SizeLabel {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SizeLabel> for String {
    fn from(size: SizeLabel) -> Self {
        size.label().to_string()
    }
}

/// Filter requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FilterName {
    Original,
    GreyScale,
    Sepia,
    Blur,
    Sharpen,
    Cartoonizer,
    Benchmark,
}

impl FilterName {
    const EXPECTED: &'static str =
        "Original, GreyScale, Sepia, Blur, Sharpen, Cartoonizer, Benchmark";

    /// Get the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::GreyScale => "GreyScale",
            Self::Sepia => "Sepia",
            Self::Blur => "Blur",
            Self::Sharpen => "Sharpen",
            Self::Cartoonizer => "Cartoonizer",
            Self::Benchmark => "Benchmark",
        }
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "greyscale" | "grayscale" => Ok(Self::GreyScale),
            "sepia" => Ok(Self::Sepia),
            "blur" => Ok(Self::Blur),
            "sharpen" => Ok(Self::Sharpen),
            "cartoonizer" => Ok(Self::Cartoonizer),
            "benchmark" => Ok(Self::Benchmark),
            _ => Err(ValidationError::UnknownVariant {
                kind: "filter",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

impl TryFrom<String> for FilterName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FilterName> for String {
    fn from(name: FilterName) -> Self {
        name.name().to_string()
    }
}

/// Where the filter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategyMode {
    Local,
    Remote,
}

impl StrategyMode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Remote => "Remote",
        }
    }
}

impl fmt::Display for StrategyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "cloudlet" => Ok(Self::Remote),
            _ => Err(ValidationError::UnknownVariant {
                kind: "strategy mode",
                value: s.to_string(),
                expected: "Local, Remote",
            }),
        }
    }
}

impl TryFrom<String> for StrategyMode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrategyMode> for String {
    fn from(mode: StrategyMode) -> Self {
        mode.name().to_string()
    }
}

/// What a benchmark sweep does when one round fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPolicy {
    /// The first failing round fails the whole sweep.
    #[default]
    AbortOnError,
    /// Record the failure against its size and round, then keep going.
    SkipFailed,
}

/// Validated image identifier.
/// Must be non-empty and must not contain path separators.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageId(String);

impl ImageId {
    /// Create a new ImageId with validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(ValidationError::InvalidFieldValue {
                field: "image",
                value: id,
                reason: "Image identifier cannot be empty".to_string(),
            });
        }

        if id.contains(['/', '\\']) || id == ".." {
            return Err(ValidationError::InvalidFieldValue {
                field: "image",
                value: id,
                reason: "Image identifier must be a bare file name".to_string(),
            });
        }

        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ImageId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageId> for String {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

/// Validated cloudlet address in `host[:port]` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteEndpoint {
    host: String,
    port: u16,
}

impl RemoteEndpoint {
    /// Create an endpoint from its parts.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ValidationError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ValidationError::InvalidEndpoint {
                value: host,
                reason: "host cannot be empty".to_string(),
            });
        }
        if port == 0 {
            return Err(ValidationError::InvalidEndpoint {
                value: format!("{}:{}", host, port),
                reason: "port 0 is reserved".to_string(),
            });
        }
        Ok(Self { host, port })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for RemoteEndpoint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|e| ValidationError::InvalidEndpoint {
                    value: s.to_string(),
                    reason: format!("bad port: {}", e),
                })?;
                Self::new(host, port)
            }
            None => Self::new(s, DEFAULT_CLOUDLET_PORT),
        }
    }
}

impl TryFrom<String> for RemoteEndpoint {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RemoteEndpoint> for String {
    fn from(endpoint: RemoteEndpoint) -> Self {
        endpoint.to_string()
    }
}

/// Validated number of benchmark rounds per size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Iterations(u32);

impl Iterations {
    pub fn new(rounds: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_ITERATIONS).contains(&rounds) {
            return Err(ValidationError::InvalidFieldValue {
                field: "iterations",
                value: rounds.to_string(),
                reason: format!("must be between 1 and {}", MAX_ITERATIONS),
            });
        }
        Ok(Self(rounds))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Iterations {
    fn default() -> Self {
        Self(DEFAULT_ITERATIONS)
    }
}

impl TryFrom<u32> for Iterations {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Iterations> for u32 {
    fn from(rounds: Iterations) -> Self {
        rounds.0
    }
}

/// Validated JPEG quality, 1-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct JpegQuality(u8);

impl JpegQuality {
    /// Quality used when encoding a freshly loaded source image.
    pub const SOURCE: JpegQuality = JpegQuality(95);
    /// Quality used by strategies when re-encoding a filtered image.
    pub const OUTPUT: JpegQuality = JpegQuality(90);

    pub fn new(quality: u8) -> Result<Self, ValidationError> {
        if !(1..=100).contains(&quality) {
            return Err(ValidationError::InvalidFieldValue {
                field: "quality",
                value: quality.to_string(),
                reason: "JPEG quality must be between 1 and 100".to_string(),
            });
        }
        Ok(Self(quality))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for JpegQuality {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JpegQuality> for u8 {
    fn from(quality: JpegQuality) -> Self {
        quality.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_label_parse_and_display() {
        assert_eq!("0.3MP".parse::<SizeLabel>().unwrap(), SizeLabel::Mp03);
        assert_eq!("8mp".parse::<SizeLabel>().unwrap(), SizeLabel::Mp8);
        assert_eq!("all".parse::<SizeLabel>().unwrap(), SizeLabel::All);
        assert_eq!(SizeLabel::Mp03.to_string(), "0.3MP");
        assert!("6MP".parse::<SizeLabel>().is_err());
    }

    #[test]
    fn test_size_sweep_expansion() {
        assert_eq!(
            SizeLabel::All.sweep(),
            vec![
                SizeLabel::Mp03,
                SizeLabel::Mp1,
                SizeLabel::Mp2,
                SizeLabel::Mp4,
                SizeLabel::Mp8
            ]
        );
        assert_eq!(SizeLabel::Mp2.sweep(), vec![SizeLabel::Mp2]);
        assert_eq!(SizeLabel::All.concrete(), SizeLabel::Mp1);
    }

    #[test]
    fn test_filter_name_parse() {
        assert_eq!("GreyScale".parse::<FilterName>().unwrap(), FilterName::GreyScale);
        assert_eq!("grayscale".parse::<FilterName>().unwrap(), FilterName::GreyScale);
        assert!("emboss".parse::<FilterName>().is_err());
    }

    #[test]
    fn test_strategy_mode_accepts_cloudlet() {
        assert_eq!("Cloudlet".parse::<StrategyMode>().unwrap(), StrategyMode::Remote);
        assert_eq!("local".parse::<StrategyMode>().unwrap(), StrategyMode::Local);
    }

    #[test]
    fn test_endpoint_parse() {
        let ep: RemoteEndpoint = "10.0.0.2:6000".parse().unwrap();
        assert_eq!(ep.host(), "10.0.0.2");
        assert_eq!(ep.port(), 6000);

        let ep: RemoteEndpoint = "cloudlet.local".parse().unwrap();
        assert_eq!(ep.port(), DEFAULT_CLOUDLET_PORT);

        assert!("host:0".parse::<RemoteEndpoint>().is_err());
        assert!(":8080".parse::<RemoteEndpoint>().is_err());
        assert!("host:http".parse::<RemoteEndpoint>().is_err());
    }

    #[test]
    fn test_image_id_validation() {
        assert!(ImageId::new("img5.jpg").is_ok());
        assert!(ImageId::new("").is_err());
        assert!(ImageId::new("../etc/passwd").is_err());
    }

    #[test]
    fn test_bounded_newtypes() {
        assert_eq!(Iterations::default().get(), 50);
        assert!(Iterations::new(0).is_err());
        assert!(JpegQuality::new(0).is_err());
        assert!(JpegQuality::new(101).is_err());
        assert_eq!(JpegQuality::SOURCE.get(), 95);
    }
}
