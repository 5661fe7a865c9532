// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Process-level errors. Every variant is fatal at startup.

use crate::config::ConfigError;
use crate::units::SchedulerError;
use senselog_channel::ChannelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Channel allocation failed: {0}")]
    Channel(#[from] ChannelError),
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
    #[error("Unit '{0}' terminated unexpectedly")]
    UnitPanicked(String),
    #[error("Unit '{0}' stopped")]
    UnitExited(String),
}
