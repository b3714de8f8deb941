//! BenchImage Core Library
//!
//! Image filter engine and benchmark harness. Provides the packed-RGB pixel
//! model, filter algorithms, local and cloudlet filter strategies, the filter
//! task state machine, the size sweep, and configuration parsing.

pub mod asset;
pub mod bench;
pub mod codec;
pub mod config;
pub mod error;
pub mod filters;
pub mod pixel;
pub mod progress;
pub mod strategy;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use asset::{AssetSource, DirAssetSource, MemoryAssetSource, SyntheticAssetSource};
pub use bench::{BenchmarkHarness, BenchmarkReport, BenchmarkRow, RoundFailure, RoundRunner};
pub use codec::{Codec, JpegCodec, RawCodec};
pub use config::{ConfigLoader, FilterConfiguration};
pub use error::{BenchError, BenchResult, StateTransitionError, ValidationError};
pub use filters::{FilterKind, Kernel};
pub use pixel::{pack_color, unpack, PixelBuffer};
pub use progress::{ChannelSink, ProgressEvent, ProgressHandle, ProgressSink, TaskEvent};
pub use strategy::{CloudletChannel, FilterStrategy, LoopbackChannel, StrategyFactory};
pub use task::{FilterTask, ResultRecord, RunKind, TaskHandle, TaskOutput, TaskState};
pub use types::{
    FilterName, ImageId, Iterations, JpegQuality, RemoteEndpoint, SizeLabel, StrategyMode,
    SweepPolicy,
};
