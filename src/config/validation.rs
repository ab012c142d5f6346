use super::models::Config;
use crate::jobs::Addon;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("job_interval must be greater than zero")]
    ZeroJobInterval,

    #[error("max_concurrent_jobs must be at least 1")]
    NoConcurrency,

    #[error("max_jobs must be positive when set")]
    ZeroMaxJobs,

    #[error("max_addons_per_job ({actual}) exceeds the number of add-ons ({limit})")]
    TooManyAddons { actual: usize, limit: usize },

    #[error("Invalid log level '{level}': {reason}")]
    InvalidLogLevel { level: String, reason: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_worker(config)?;
    validate_telemetry(config)?;
    Ok(())
}

fn validate_worker(config: &Config) -> Result<(), ValidationError> {
    let worker = &config.worker;

    if worker.job_interval.as_duration().is_zero() {
        return Err(ValidationError::ZeroJobInterval);
    }

    if worker.max_concurrent_jobs == 0 {
        return Err(ValidationError::NoConcurrency);
    }

    if worker.max_jobs == Some(0) {
        return Err(ValidationError::ZeroMaxJobs);
    }

    if worker.max_addons_per_job > Addon::ALL.len() {
        return Err(ValidationError::TooManyAddons {
            actual: worker.max_addons_per_job,
            limit: Addon::ALL.len(),
        });
    }

    Ok(())
}

fn validate_telemetry(config: &Config) -> Result<(), ValidationError> {
    let level = &config.telemetry.log_level;
    EnvFilter::try_new(level).map_err(|e| ValidationError::InvalidLogLevel {
        level: level.clone(),
        reason: e.to_string(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = Config::default();
        config.worker.max_concurrent_jobs = 0;
        assert!(matches!(validate(&config), Err(ValidationError::NoConcurrency)));
    }

    #[test]
    fn test_zero_job_interval() {
        let mut config = Config::default();
        config.worker.job_interval = "0ms".parse().unwrap();
        assert!(matches!(validate(&config), Err(ValidationError::ZeroJobInterval)));
    }

    #[test]
    fn test_zero_max_jobs() {
        let mut config = Config::default();
        config.worker.max_jobs = Some(0);
        assert!(matches!(validate(&config), Err(ValidationError::ZeroMaxJobs)));
    }

    #[test]
    fn test_too_many_addons() {
        let mut config = Config::default();
        config.worker.max_addons_per_job = 4;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::TooManyAddons { actual: 4, limit: 3 })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.telemetry.log_level = "carwash=loud".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidLogLevel { .. })
        ));
    }

    #[test]
    fn test_directive_log_level_is_valid() {
        let mut config = Config::default();
        config.telemetry.log_level = "carwash=debug,warn".to_string();
        assert!(validate(&config).is_ok());
    }
}
