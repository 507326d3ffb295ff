use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::types::SweeperConfig;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SWEEPER_CONFIG";

/// Resolve the config file location.
///
/// Priority: `$SWEEPER_CONFIG` > `<config_dir>/sweeper/config.toml`.
/// Returns `None` when neither is available (no config dir on this platform).
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("sweeper").join("config.toml"))
}

/// Load and validate the config from [`config_path`]. A missing file yields defaults.
pub fn load() -> Result<SweeperConfig, ConfigError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            debug!(event = "config.load_skipped", reason = "no config dir");
            Ok(SweeperConfig::default())
        }
    }
}

/// Load and validate the config at `path`. A missing file yields defaults.
pub fn load_from(path: &Path) -> Result<SweeperConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(event = "config.load_defaulted", path = %path.display());
            return Ok(SweeperConfig::default());
        }
        Err(e) => return Err(ConfigError::IoError { source: e }),
    };

    let config: SweeperConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    config.validate()?;

    info!(
        event = "config.load_completed",
        path = %path.display(),
        regions = config.sweep.regions.len(),
        concurrency = config.sweep.concurrency
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, SweeperConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[sweep]\nregions = [\"us-west-2\"]\nconcurrency = 4\n\n[kms]\ndeletion_window_in_days = 10"
        )
        .unwrap();

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.sweep.regions, vec!["us-west-2"]);
        assert_eq!(config.sweep.concurrency, 4);
        assert_eq!(config.kms.deletion_window_in_days, 10);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sweep\nregions = ").unwrap();

        let err = load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[kms]\ndeletion_window_in_days = 3").unwrap();

        let err = load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_env_var_selects_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sweep]\nregions = [\"eu-central-1\"]").unwrap();

        temp_env::with_var(CONFIG_ENV_VAR, Some(file.path()), || {
            assert_eq!(config_path().as_deref(), Some(file.path()));
            let config = load().unwrap();
            assert_eq!(config.sweep.regions, vec!["eu-central-1"]);
        });
    }

    #[test]
    fn test_empty_env_var_falls_back_to_config_dir() {
        temp_env::with_var(CONFIG_ENV_VAR, Some(""), || {
            let path = config_path();
            if let Some(path) = path {
                assert!(path.ends_with("sweeper/config.toml"));
            }
        });
    }
}
