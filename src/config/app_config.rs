// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pipeline configuration (channel size, unit timing and priorities).

use crate::config::ConfigError;
use crate::units::Priority;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default stack budget for each unit, in bytes.
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

/// Bounded channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Number of readings the channel can hold.
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

/// Sampler unit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Sampling period in milliseconds.
    pub interval_ms: u64,
    pub priority: Priority,
    /// Thread stack size in bytes.
    pub stack_size: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            priority: Priority(8),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Consumer unit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    pub priority: Priority,
    /// Thread stack size in bytes.
    pub stack_size: usize,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            priority: Priority(7),
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
}

impl PipelineConfig {
    /// Load config from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the pipeline cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.capacity == 0 {
            return Err(ConfigError::Invalid("channel.capacity must be at least 1".into()));
        }
        if self.sampler.interval_ms == 0 {
            return Err(ConfigError::Invalid("sampler.interval_ms must be at least 1".into()));
        }
        if self.sampler.stack_size == 0 || self.consumer.stack_size == 0 {
            return Err(ConfigError::Invalid("stack_size must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.channel.capacity, 10);
        assert_eq!(config.sampler.interval(), Duration::from_millis(1000));
        assert!(config.consumer.priority.outranks(config.sampler.priority));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            [channel]
            capacity = 4

            [sampler]
            interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.channel.capacity, 4);
        assert_eq!(config.sampler.interval_ms, 250);
        assert_eq!(config.sampler.priority, Priority(8));
        assert_eq!(config.consumer, ConsumerConfig::default());
    }

    #[test]
    fn test_empty_toml() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = PipelineConfig::default();
        config.consumer.priority = Priority(2);
        let text = config.to_toml().unwrap();
        assert!(text.contains("[consumer]"));
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = PipelineConfig::default();
        config.channel.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PipelineConfig::default();
        config.sampler.interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = PipelineConfig::default();
        config.consumer.stack_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
