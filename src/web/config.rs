use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::DEFAULT_BASE_URL;
use crate::predict::EARTH_RADIUS_KM;
use crate::tracker::MAX_STEP;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub source: SourceConfig,
    /// Satellites requested at startup.
    #[serde(default = "default_initial")]
    pub initial: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// Simulated time added per tick.
    #[serde(default = "default_step", deserialize_with = "deserialize_duration")]
    pub step: Duration,
    /// Wall-clock time between ticks.
    #[serde(
        default = "default_tick_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub tick_interval: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            tick_interval: default_tick_interval(),
        }
    }
}

fn default_step() -> Duration {
    Duration::from_secs(3)
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(100)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_reference_radius")]
    pub reference_radius_km: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            reference_radius_km: default_reference_radius(),
        }
    }
}

fn default_reference_radius() -> f64 {
    EARTH_RADIUS_KM
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Keeptrack {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
        timeout: Duration,
    },
    TleFolder {
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Keeptrack {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_initial() -> Vec<String> {
    vec!["25544".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig::default(),
            clock: ClockConfig::default(),
            projection: ProjectionConfig::default(),
            source: SourceConfig::default(),
            initial: default_initial(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.step.is_zero() {
            return Err(ConfigError::Invalid {
                field: "clock.step",
                message: "must be positive".into(),
            });
        }
        if self.clock_step()? > MAX_STEP {
            return Err(ConfigError::Invalid {
                field: "clock.step",
                message: format!("must be at most {} days", MAX_STEP.num_days()),
            });
        }
        if self.clock.tick_interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "clock.tick_interval",
                message: "must be positive".into(),
            });
        }
        let radius = self.projection.reference_radius_km;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "projection.reference_radius_km",
                message: format!("must be a positive number, got {}", radius),
            });
        }
        Ok(())
    }

    /// Simulated step as a chrono duration for the clock.
    pub fn clock_step(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.clock.step).map_err(|e| ConfigError::Invalid {
            field: "clock.step",
            message: e.to_string(),
        })
    }
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
