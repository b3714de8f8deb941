// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Background execution of a filter request.
//!
//! [`FilterTask::run`] spawns onto the tokio runtime and returns a
//! [`TaskHandle`] immediately. Pixel work goes to the blocking pool.
//! Cancellation is observed between phases and between benchmark rounds,
//! never in the middle of a strategy call, so every strategy that was
//! opened also gets closed.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::record::ResultRecord;
use super::state::{RunKind, TaskState, TaskStateMachine};
use crate::asset::AssetSource;
use crate::bench::{BenchmarkHarness, BenchmarkReport, RoundRunner};
use crate::codec::Codec;
use crate::config::FilterConfiguration;
use crate::error::{BenchError, BenchResult};
use crate::filters::FilterKind;
use crate::pixel::PixelBuffer;
use crate::progress::{ProgressHandle, ProgressSink};
use crate::strategy::StrategyFactory;
use crate::types::{FilterName, SizeLabel};

/// What the spawned task hands back.
#[derive(Debug)]
pub struct TaskOutput {
    pub record: ResultRecord,
    /// Present for benchmark runs.
    pub report: Option<BenchmarkReport>,
}

/// A filter request bound to its collaborators.
#[derive(Debug)]
pub struct FilterTask {
    id: Uuid,
    config: FilterConfiguration,
    filter: FilterKind,
    assets: Arc<dyn AssetSource>,
    codec: Arc<dyn Codec>,
    factory: StrategyFactory,
    progress: ProgressHandle,
}

impl FilterTask {
    /// Task that loads through `assets` and encodes with `codec`.
    ///
    /// `Benchmark` requests sweep the grayscale filter.
    pub fn new(
        config: FilterConfiguration,
        assets: Arc<dyn AssetSource>,
        codec: Arc<dyn Codec>,
    ) -> Self {
        let filter = FilterKind::from_name(config.filter).unwrap_or_default();
        let factory = StrategyFactory::new(Arc::clone(&codec))
            .filter(filter)
            .quality(config.output_quality);
        Self {
            id: Uuid::new_v4(),
            config,
            filter,
            assets,
            codec,
            factory,
            progress: ProgressHandle::detached(),
        }
    }

    /// Replace the strategy factory.
    pub fn factory(mut self, factory: StrategyFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Report progress into `sink`. Only a weak reference is kept.
    pub fn progress(mut self, sink: &Arc<dyn ProgressSink>) -> Self {
        self.progress = ProgressHandle::new(sink);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &FilterConfiguration {
        &self.config
    }

    /// Which path `run` takes.
    pub fn run_kind(&self) -> RunKind {
        if self.config.is_benchmark() {
            RunKind::Benchmark
        } else if self.config.filter == FilterName::Original {
            RunKind::Original
        } else {
            RunKind::SingleFilter
        }
    }

    /// Spawn the task. Must be called from within a tokio runtime.
    pub fn run(self) -> TaskHandle {
        let id = self.id;
        let (machine, state) = TaskStateMachine::new(id);
        let cancel = CancellationToken::new();
        let span = tracing::info_span!("filter_task", task_id = %id);

        let token = cancel.clone();
        let join = tokio::spawn(self.drive(machine, token).instrument(span));

        TaskHandle {
            id,
            state,
            cancel,
            join,
        }
    }

    async fn drive(
        self,
        mut machine: TaskStateMachine,
        cancel: CancellationToken,
    ) -> BenchResult<TaskOutput> {
        let kind = self.run_kind();
        if cancel.is_cancelled() {
            machine.transition_to(TaskState::Failed)?;
            self.progress.complete(None);
            return Err(BenchError::Cancelled);
        }
        machine.transition_to(TaskState::Running(kind))?;

        tracing::info!(
            image = %self.config.image,
            filter = %self.config.filter,
            size = %self.config.size,
            mode = %self.config.mode,
            kind = kind.name(),
            "Task started"
        );

        let outcome = match kind {
            RunKind::Original => self
                .original(self.config.size.concrete())
                .await
                .map(|record| TaskOutput { record, report: None }),
            RunKind::SingleFilter => self
                .single_filter(self.config.size.concrete(), true, &cancel)
                .await
                .map(|record| TaskOutput { record, report: None }),
            RunKind::Benchmark => self.benchmark(&cancel).await,
        };

        match outcome {
            Ok(output) => {
                machine.transition_to(TaskState::Completed)?;
                tracing::info!(
                    total_ms = output.record.total_time_ms,
                    offload_ms = output.record.offload_time_ms,
                    "Task completed"
                );
                if self.progress.is_attached() {
                    self.progress.complete(Some(output.record.clone()));
                }
                Ok(output)
            }
            Err(e) => {
                machine.transition_to(TaskState::Failed)?;
                tracing::warn!(error = %e, "Task failed");
                self.progress.complete(None);
                Err(e)
            }
        }
    }

    /// Load and decode; elapsed is the load alone.
    async fn original(&self, size: SizeLabel) -> BenchResult<ResultRecord> {
        let start = Instant::now();
        self.progress.emit(0, "Loading image!", None);
        let image = self.load_source(size).await?;
        let total_time_ms = start.elapsed().as_millis() as u64;
        self.progress.emit(100, "Image loaded!", None);

        Ok(ResultRecord {
            image,
            total_time_ms,
            offload_time_ms: 0,
            config: self.config.at_size(size),
        })
    }

    /// One strategy pass at `size`, timed from load to decoded result.
    async fn single_filter(
        &self,
        size: SizeLabel,
        report_progress: bool,
        cancel: &CancellationToken,
    ) -> BenchResult<ResultRecord> {
        let start = Instant::now();
        if report_progress {
            self.progress.emit(0, "Loading image!", None);
        }

        let source = self.load_source(size).await?;
        let encoded = self.encode_source(source).await?;
        if report_progress {
            self.progress.emit(50, "Image loaded!", None);
        }
        checkpoint(cancel)?;

        let key = self.config.strategy_key.as_str();
        let mut strategy = self
            .factory
            .create(self.config.mode, key, self.config.remote.as_ref())
            .ok_or_else(|| BenchError::StrategyUnavailable {
                key: key.to_string(),
            })?;

        // The channel is closed on every branch, cancelled round trips included.
        let applied = tokio::select! {
            applied = strategy.apply(encoded) => applied,
            _ = cancel.cancelled() => Err(BenchError::Cancelled),
        };
        let offload_time_ms = strategy.offload_time_ms();
        let closed = strategy.close_channel().await;
        let output = applied?;
        closed?;
        checkpoint(cancel)?;

        let image = self.decode(output).await?;
        let total_time_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            size = %size,
            total_ms = total_time_ms,
            offload_ms = offload_time_ms,
            "Filter round finished"
        );
        if report_progress {
            self.progress.emit(
                100,
                format!("{} Completed!", self.filter),
                Some(format!("{}ms", total_time_ms)),
            );
        }

        Ok(ResultRecord {
            image,
            total_time_ms,
            offload_time_ms,
            config: self.config.at_size(size),
        })
    }

    async fn benchmark(&self, cancel: &CancellationToken) -> BenchResult<TaskOutput> {
        let sizes = self.config.sweep_sizes();
        let harness = BenchmarkHarness::new()
            .iterations(self.config.iterations)
            .policy(self.config.sweep_policy)
            .cancel_token(cancel.clone());
        let rounds = Rounds { task: self, cancel };

        let report = harness
            .run(&sizes, &self.config.strategy_key, &rounds, &self.progress)
            .await?;

        let record = match report.aggregate() {
            Some(record) => record,
            None => {
                tracing::info!(
                    "No benchmark round produced an image, falling back to the original"
                );
                let mut record = self.original(self.config.size.concrete()).await?;
                record.total_time_ms = report.total_time_ms();
                record
            }
        };

        Ok(TaskOutput {
            record,
            report: Some(report),
        })
    }

    async fn load_source(&self, size: SizeLabel) -> BenchResult<PixelBuffer> {
        let assets = Arc::clone(&self.assets);
        let codec = Arc::clone(&self.codec);
        let image = self.config.image.clone();
        tokio::task::spawn_blocking(move || {
            let bytes = assets.load(&image, size)?;
            codec.decode(&bytes)
        })
        .await?
    }

    async fn encode_source(&self, source: PixelBuffer) -> BenchResult<Vec<u8>> {
        let codec = Arc::clone(&self.codec);
        let quality = self.config.source_quality;
        tokio::task::spawn_blocking(move || codec.encode(&source, quality)).await?
    }

    async fn decode(&self, bytes: Vec<u8>) -> BenchResult<PixelBuffer> {
        let codec = Arc::clone(&self.codec);
        tokio::task::spawn_blocking(move || codec.decode(&bytes)).await?
    }
}

fn checkpoint(cancel: &CancellationToken) -> BenchResult<()> {
    if cancel.is_cancelled() {
        Err(BenchError::Cancelled)
    } else {
        Ok(())
    }
}

/// Benchmark rounds as silent single-filter passes.
struct Rounds<'a> {
    task: &'a FilterTask,
    cancel: &'a CancellationToken,
}

#[async_trait]
impl RoundRunner for Rounds<'_> {
    async fn run_round(&self, size: SizeLabel) -> BenchResult<ResultRecord> {
        self.task.single_filter(size, false, self.cancel).await
    }
}

/// Handle to a spawned [`FilterTask`].
#[derive(Debug)]
pub struct TaskHandle {
    id: Uuid,
    state: watch::Receiver<TaskState>,
    cancel: CancellationToken,
    join: JoinHandle<BenchResult<TaskOutput>>,
}

impl TaskHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest published state.
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// A receiver that observes every later state change.
    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.clone()
    }

    /// Ask the task to stop. An in-flight strategy call is abandoned and its
    /// channel closed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the task. `Err` carries why no result was produced.
    pub async fn join(self) -> BenchResult<ResultRecord> {
        self.join_output().await.map(|output| output.record)
    }

    /// Wait for the task, keeping the benchmark report if there is one.
    pub async fn join_output(self) -> BenchResult<TaskOutput> {
        self.join.await?
    }
}
