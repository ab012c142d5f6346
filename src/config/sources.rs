use super::models::Config;
use config::{ConfigError, Environment, File, Map};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_PATH_VAR: &str = "CARWASH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/carwash.toml";
const ENV_PREFIX: &str = "CARWASH";
const ENV_SEPARATOR: &str = "__";

/// Config file location: `$CARWASH_CONFIG`, else `config/carwash.toml`
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read `.env` into the process environment, then layer the config file
/// and `CARWASH__*` variables over the struct defaults
pub fn load() -> Result<Config, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!(path = %path.display(), "Loaded .env");
    }

    load_from_sources(&config_path())
}

/// Same layering as [`load`] against an explicit file, without `.env`
pub fn load_from_sources(config_path: &Path) -> Result<Config, ConfigError> {
    layered(config_path, None)
}

/// `env_vars` replaces the process environment when given
fn layered(config_path: &Path, env_vars: Option<Map<String, String>>) -> Result<Config, ConfigError> {
    if config_path.is_file() {
        debug!(path = %config_path.display(), "Reading config file");
    } else {
        warn!(path = %config_path.display(), "Config file not found, using defaults");
    }

    config::Config::builder()
        .add_source(File::from(config_path).required(false))
        .add_source(environment(env_vars))
        .build()?
        .try_deserialize()
}

/// `CARWASH__WORKER__MAX_JOBS=10` sets `worker.max_jobs`
fn environment(env_vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .source(env_vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("absent.toml");

        let config = layered(&config_path, vars(&[])).unwrap();
        assert_eq!(config.worker.max_concurrent_jobs, 1);
        assert_eq!(config.worker.max_jobs, None);
        assert_eq!(config.handlers.wash_delay.as_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_file_values_accept_strings_and_millis() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("carwash.toml");
        fs::write(
            &config_path,
            "[worker]\njob_interval = \"250ms\"\nmax_concurrent_jobs = 4\n\n\
             [handlers]\nwash_delay = \"2s\"\naddon_delay = 500\n",
        )
        .unwrap();

        let config = layered(&config_path, vars(&[])).unwrap();
        assert_eq!(config.worker.job_interval.as_duration(), Duration::from_millis(250));
        assert_eq!(config.worker.max_concurrent_jobs, 4);
        assert_eq!(config.handlers.wash_delay.as_duration(), Duration::from_secs(2));
        assert_eq!(config.handlers.addon_delay.as_duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("carwash.toml");
        fs::write(&config_path, "[worker]\nmax_concurrent_jobs = 4\n").unwrap();

        let config = layered(
            &config_path,
            vars(&[
                ("CARWASH__WORKER__MAX_CONCURRENT_JOBS", "6"),
                ("CARWASH__HANDLERS__WASH_DELAY", "3s"),
                ("OTHERAPP__WORKER__MAX_JOBS", "9"),
            ]),
        )
        .unwrap();

        assert_eq!(config.worker.max_concurrent_jobs, 6);
        assert_eq!(config.worker.max_jobs, None);
        assert_eq!(config.handlers.wash_delay.as_duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_oversized_duration_is_load_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("carwash.toml");
        fs::write(&config_path, "[handlers]\nwash_delay = \"5124095576030432h\"\n").unwrap();

        assert!(layered(&config_path, vars(&[])).is_err());
        let from_env = layered(
            &temp_dir.path().join("absent.toml"),
            vars(&[("CARWASH__WORKER__JOB_INTERVAL", "307445734561825862m")]),
        );
        assert!(from_env.is_err());
    }
}
