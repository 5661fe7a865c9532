// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Output sinks for rendered readings and pipeline warnings.

use std::sync::Arc;
use tracing::{info, warn};

/// Fire-and-forget line output. No backpressure reaches the caller.
pub trait OutputSink: Send + Sync {
    fn emit(&self, line: &str);

    /// Warning-level observation, such as a reading dropped on a full
    /// channel. Plain sinks treat it as another line.
    fn warn(&self, line: &str) {
        self.emit(line);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Arc<S> {
    fn emit(&self, line: &str) {
        (**self).emit(line)
    }

    fn warn(&self, line: &str) {
        (**self).warn(line)
    }
}

/// Emits readings as `info` and warnings as `warn` events on the
/// `senselog::readings` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn emit(&self, line: &str) {
        info!(target: "senselog::readings", "{}", line);
    }

    fn warn(&self, line: &str) {
        warn!(target: "senselog::readings", "{}", line);
    }
}

/// Keeps every emitted line and warning in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemorySink {
    lines: parking_lot::Mutex<Vec<String>>,
    warnings: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemorySink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Copy of all lines emitted so far.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub(crate) fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
impl OutputSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.lock().push(line.to_owned());
    }

    fn warn(&self, line: &str) {
        self.warnings.lock().push(line.to_owned());
    }
}
