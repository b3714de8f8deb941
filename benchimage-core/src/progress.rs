// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Progress reporting from a running task to whoever owns the display.
//!
//! A task never keeps its sink alive. It holds a [`ProgressHandle`] wrapping a
//! weak reference, and every event sent after the owner dropped the sink is
//! discarded without error.

use std::sync::{Arc, Weak};

use tokio::sync::mpsc;

use crate::task::ResultRecord;

/// One progress checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0..=100
    pub percent: u8,
    pub status: String,
    /// Human timing text such as `"42ms"`.
    pub timing: Option<String>,
}

/// Receiver of task progress.
///
/// Calls arrive from the task's worker; an implementation that must run on a
/// particular context (a UI thread, the CLI main loop) forwards them there,
/// as [`ChannelSink`] does.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: ProgressEvent);

    /// Terminal call. `None` signals failure.
    fn completed(&self, result: Option<ResultRecord>);
}

/// Weak capability to report into a sink.
#[derive(Clone, Default)]
pub struct ProgressHandle {
    sink: Option<Weak<dyn ProgressSink>>,
}

impl ProgressHandle {
    pub fn new(sink: &Arc<dyn ProgressSink>) -> Self {
        Self {
            sink: Some(Arc::downgrade(sink)),
        }
    }

    /// A handle that reports nowhere.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the sink is still alive.
    pub fn is_attached(&self) -> bool {
        self.sink.as_ref().is_some_and(|w| w.strong_count() > 0)
    }

    pub fn emit(&self, percent: u8, status: impl Into<String>, timing: Option<String>) {
        if let Some(sink) = self.upgrade() {
            sink.on_progress(ProgressEvent {
                percent: percent.min(100),
                status: status.into(),
                timing,
            });
        }
    }

    pub fn complete(&self, result: Option<ResultRecord>) {
        if let Some(sink) = self.upgrade() {
            sink.completed(result);
        }
    }

    fn upgrade(&self) -> Option<Arc<dyn ProgressSink>> {
        self.sink.as_ref().and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Event as delivered through a [`ChannelSink`].
#[derive(Debug)]
pub enum TaskEvent {
    Progress(ProgressEvent),
    Completed(Option<ResultRecord>),
}

/// Sink that forwards every call into an mpsc channel, preserving order.
///
/// The receiving side runs wherever the owner wants the events handled.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TaskEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<TaskEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, event: ProgressEvent) {
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(TaskEvent::Progress(event));
    }

    fn completed(&self, result: Option<ResultRecord>) {
        let _ = self.tx.send(TaskEvent::Completed(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_preserves_order() {
        let (sink, mut rx) = ChannelSink::new();
        let sink: Arc<dyn ProgressSink> = sink;
        let handle = ProgressHandle::new(&sink);

        handle.emit(0, "Loading image!", None);
        handle.emit(50, "Image loaded!", Some("3ms".to_string()));
        handle.complete(None);

        match rx.try_recv().unwrap() {
            TaskEvent::Progress(e) => assert_eq!(e.status, "Loading image!"),
            other => panic!("unexpected {:?}", other),
        }
        match rx.try_recv().unwrap() {
            TaskEvent::Progress(e) => {
                assert_eq!(e.percent, 50);
                assert_eq!(e.timing.as_deref(), Some("3ms"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(rx.try_recv().unwrap(), TaskEvent::Completed(None)));
    }

    #[test]
    fn test_dropped_sink_is_silent() {
        let (sink, rx) = ChannelSink::new();
        let sink: Arc<dyn ProgressSink> = sink;
        let handle = ProgressHandle::new(&sink);
        assert!(handle.is_attached());

        drop(sink);
        assert!(!handle.is_attached());
        handle.emit(10, "ignored", None);
        handle.complete(None);
        drop(rx);
    }

    #[test]
    fn test_detached_handle() {
        let handle = ProgressHandle::detached();
        assert!(!handle.is_attached());
        handle.emit(100, "nowhere", None);
    }

    #[test]
    fn test_percent_is_capped() {
        let (sink, mut rx) = ChannelSink::new();
        let sink: Arc<dyn ProgressSink> = sink;
        ProgressHandle::new(&sink).emit(250, "over", None);
        match rx.try_recv().unwrap() {
            TaskEvent::Progress(e) => assert_eq!(e.percent, 100),
            other => panic!("unexpected {:?}", other),
        }
    }
}
