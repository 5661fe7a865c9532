// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Senselog - periodic sensor data logger.
//!
//! Samples a simulated temperature/humidity sensor once per period and logs
//! every reading that makes it through the bounded channel.

use senselog::config::{ConfigManager, PipelineConfig};
use senselog::realtime::{SimulatedSensor, SystemClock};
use senselog::sink::TracingSink;
use senselog::units::ThreadScheduler;
use senselog::Pipeline;
use tracing::{error, info, warn};
use tracing_subscriber::filter::{EnvFilter, ParseError};

/// Log filter used when `RUST_LOG` is unset or empty.
const DEFAULT_LOG_FILTER: &str = "senselog=info";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref())?)
        .init();

    info!("Data logger starting");
    info!("Host: {}-{}", std::env::consts::ARCH, std::env::consts::OS);

    let config = load_config();
    info!(
        "Config: capacity {}, interval {} ms",
        config.channel.capacity, config.sampler.interval_ms
    );

    let pipeline = match Pipeline::start(
        &config,
        ThreadScheduler,
        SimulatedSensor::new(SystemClock::new()),
        TracingSink,
    ) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to start pipeline: {}", e);
            return Err(e.into());
        }
    };

    // Units run for the life of the process.
    if let Err(e) = pipeline.join() {
        error!("{}", e);
        return Err(e.into());
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise only our own crate logs at `info`.
fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter, ParseError> {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives),
        None => EnvFilter::try_new(DEFAULT_LOG_FILTER),
    }
}

/// Load the config file, falling back to defaults if it cannot be read.
fn load_config() -> PipelineConfig {
    let manager = match ConfigManager::new() {
        Ok(manager) => manager,
        Err(e) => {
            warn!("Config unavailable ({}), using defaults", e);
            return PipelineConfig::default();
        }
    };

    manager.load_config().unwrap_or_else(|e| {
        warn!("Failed to load {:?}: {}, using defaults", manager.config_path(), e);
        PipelineConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_without_rust_log() {
        assert_eq!(log_filter(None).unwrap().to_string(), DEFAULT_LOG_FILTER);
        assert_eq!(log_filter(Some("  ")).unwrap().to_string(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_rust_log_overrides_default() {
        let filter = log_filter(Some("senselog=debug")).unwrap().to_string();
        assert!(filter.contains("senselog=debug"), "got {}", filter);
        assert!(!filter.contains("senselog=info"), "got {}", filter);
    }

    #[test]
    fn test_invalid_rust_log_is_an_error() {
        assert!(log_filter(Some("senselog=notalevel")).is_err());
    }
}
