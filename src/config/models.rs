use crate::humanize::HumanDuration;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub handlers: HandlerSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Host loop settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Pause between generated jobs
    #[serde(default = "default_job_interval")]
    pub job_interval: HumanDuration,
    /// Stop after this many jobs (unbounded when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_jobs: Option<u64>,
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
    #[serde(default = "default_max_addons_per_job")]
    pub max_addons_per_job: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            job_interval: default_job_interval(),
            max_jobs: None,
            max_concurrent_jobs: default_max_concurrent_jobs(),
            max_addons_per_job: default_max_addons_per_job(),
        }
    }
}

fn default_job_interval() -> HumanDuration {
    HumanDuration::from_secs(1)
}

fn default_max_concurrent_jobs() -> usize {
    1
}

fn default_max_addons_per_job() -> usize {
    3
}

/// Simulated work time per action
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerSettings {
    #[serde(default = "default_action_delay")]
    pub wash_delay: HumanDuration,
    #[serde(default = "default_action_delay")]
    pub addon_delay: HumanDuration,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            wash_delay: default_action_delay(),
            addon_delay: default_action_delay(),
        }
    }
}

fn default_action_delay() -> HumanDuration {
    HumanDuration::from_secs(1)
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.worker.job_interval.as_duration(), Duration::from_secs(1));
        assert_eq!(config.worker.max_jobs, None);
        assert_eq!(config.worker.max_concurrent_jobs, 1);
        assert_eq!(config.worker.max_addons_per_job, 3);
        assert_eq!(config.handlers.wash_delay.as_duration(), Duration::from_secs(1));
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.json);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[handlers]
addon_delay = "250ms"
            "#,
        )
        .unwrap();

        assert_eq!(config.handlers.addon_delay.as_duration(), Duration::from_millis(250));
        assert_eq!(config.handlers.wash_delay.as_duration(), Duration::from_secs(1));
        assert_eq!(config.worker.max_concurrent_jobs, 1);
    }

    #[test]
    fn test_serializes_back_to_toml() {
        let rendered = toml::to_string(&Config::default()).unwrap();
        assert!(rendered.contains("job_interval = \"1s\""));
        assert!(!rendered.contains("max_jobs"));
    }
}
