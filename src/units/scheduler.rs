// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Execution units and the scheduler that runs them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Failed to spawn unit '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Static unit priority. Lower values are more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    /// Whether a ready unit at `self` should run before one at `other`.
    pub fn outranks(self, other: Priority) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// What the scheduler needs to know to start a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
    pub name: String,
    pub priority: Priority,
    /// Stack budget in bytes; `None` uses the platform default.
    pub stack_size: Option<usize>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            name: name.into(),
            priority,
            stack_size: None,
        }
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Handle to a running unit.
#[derive(Debug)]
pub struct UnitHandle {
    name: String,
    priority: Priority,
    handle: JoinHandle<()>,
}

impl UnitHandle {
    pub fn new(name: impl Into<String>, priority: Priority, handle: JoinHandle<()>) -> Self {
        Self {
            name: name.into(),
            priority,
            handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the unit to terminate. `Err` carries the panic payload.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

/// Runs execution units.
pub trait Scheduler: Send + Sync {
    /// Start `entry` as an independently scheduled unit.
    fn spawn<F>(&self, spec: UnitSpec, entry: F) -> Result<UnitHandle, SchedulerError>
    where
        F: FnOnce() + Send + 'static;

    /// Suspend the calling unit only.
    fn sleep(&self, duration: Duration);
}

/// One OS thread per unit.
///
/// Std threads have no portable static priorities; callers that care about
/// precedence spawn the more urgent unit first (see
/// [`Pipeline::start`](crate::Pipeline::start)). The priority is kept on the
/// handle for reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn spawn<F>(&self, spec: UnitSpec, entry: F) -> Result<UnitHandle, SchedulerError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut builder = thread::Builder::new().name(spec.name.clone());
        if let Some(bytes) = spec.stack_size {
            builder = builder.stack_size(bytes);
        }

        let handle = builder.spawn(entry).map_err(|source| SchedulerError::Spawn {
            name: spec.name.clone(),
            source,
        })?;

        debug!(
            "Spawned unit '{}' ({}, stack {:?})",
            spec.name, spec.priority, spec.stack_size
        );
        Ok(UnitHandle::new(spec.name, spec.priority, handle))
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
