// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Filter tasks: lifecycle, execution and results.

pub mod record;
pub mod runner;
pub mod state;

pub use record::ResultRecord;
pub use runner::{FilterTask, TaskHandle, TaskOutput};
pub use state::{RunKind, TaskState, TaskStateMachine};
