// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Task state machine with typed state transitions.
//!
//! Lifecycle: Idle → Running{kind} → Completed | Failed.
//! Invalid transitions result in StateTransitionError. Every accepted
//! transition is published on a `watch` channel.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::StateTransitionError;

/// What a running task is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunKind {
    /// Load and decode only.
    Original,
    /// One strategy pass.
    SingleFilter,
    /// Size sweep.
    Benchmark,
}

impl RunKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::SingleFilter => "SingleFilter",
            Self::Benchmark => "Benchmark",
        }
    }
}

/// Task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Created, not yet started.
    Idle,
    Running(RunKind),
    /// Terminal; a result was produced.
    Completed,
    /// Terminal; no result.
    Failed,
}

impl TaskState {
    /// Get the state name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running(RunKind::Original) => "Running(Original)",
            Self::Running(RunKind::SingleFilter) => "Running(SingleFilter)",
            Self::Running(RunKind::Benchmark) => "Running(Benchmark)",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Check if transition to the target state is valid.
    pub fn can_transition_to(&self, target: TaskState) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Running(_))
                // cancelled before it started
                | (Self::Idle, Self::Failed)
                | (Self::Running(_), Self::Completed)
                | (Self::Running(_), Self::Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State machine for one task.
#[derive(Debug)]
pub struct TaskStateMachine {
    task_id: Uuid,
    current_state: TaskState,
    transition_count: u64,
    publisher: watch::Sender<TaskState>,
}

impl TaskStateMachine {
    /// Create a machine in `Idle` together with a receiver of its states.
    pub fn new(task_id: Uuid) -> (Self, watch::Receiver<TaskState>) {
        let (publisher, receiver) = watch::channel(TaskState::Idle);
        let machine = Self {
            task_id,
            current_state: TaskState::Idle,
            transition_count: 0,
            publisher,
        };
        (machine, receiver)
    }

    pub fn state(&self) -> TaskState {
        self.current_state
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Attempt to transition to a new state.
    pub fn transition_to(&mut self, target: TaskState) -> Result<(), StateTransitionError> {
        if !self.current_state.can_transition_to(target) {
            return Err(StateTransitionError::InvalidTransition {
                task_id: self.task_id.to_string(),
                from: self.current_state.name(),
                to: target.name(),
            });
        }

        tracing::debug!(
            task_id = %self.task_id,
            from = self.current_state.name(),
            to = target.name(),
            "State transition"
        );

        self.current_state = target;
        self.transition_count += 1;
        // No receivers left is fine; the state is still tracked here.
        self.publisher.send_replace(target);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> (TaskStateMachine, watch::Receiver<TaskState>) {
        TaskStateMachine::new(Uuid::new_v4())
    }

    #[test]
    fn test_initial_state() {
        let (sm, rx) = machine();
        assert_eq!(sm.state(), TaskState::Idle);
        assert_eq!(*rx.borrow(), TaskState::Idle);
        assert_eq!(sm.transition_count(), 0);
    }

    #[test]
    fn test_valid_transitions_are_published() {
        let (mut sm, rx) = machine();

        sm.transition_to(TaskState::Running(RunKind::SingleFilter)).unwrap();
        assert_eq!(*rx.borrow(), TaskState::Running(RunKind::SingleFilter));

        sm.transition_to(TaskState::Completed).unwrap();
        assert_eq!(*rx.borrow(), TaskState::Completed);
        assert_eq!(sm.transition_count(), 2);
        assert!(sm.state().is_terminal());
    }

    #[test]
    fn test_invalid_transitions() {
        let (mut sm, _rx) = machine();

        // Idle → Completed skips Running
        assert!(sm.transition_to(TaskState::Completed).is_err());
        assert_eq!(sm.state(), TaskState::Idle);

        sm.transition_to(TaskState::Running(RunKind::Benchmark)).unwrap();
        assert!(sm.transition_to(TaskState::Running(RunKind::Original)).is_err());
        assert!(sm.transition_to(TaskState::Idle).is_err());

        sm.transition_to(TaskState::Failed).unwrap();
        // terminal states are final
        assert!(sm.transition_to(TaskState::Completed).is_err());
        assert!(sm.transition_to(TaskState::Running(RunKind::Original)).is_err());
    }

    #[test]
    fn test_transition_error_names_states() {
        let (mut sm, _rx) = machine();
        let err = sm.transition_to(TaskState::Completed).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Idle"));
        assert!(msg.contains("Completed"));
    }

    #[test]
    fn test_dropped_receiver_does_not_block_transitions() {
        let (mut sm, rx) = machine();
        drop(rx);
        sm.transition_to(TaskState::Running(RunKind::Original)).unwrap();
        sm.transition_to(TaskState::Completed).unwrap();
    }
}
