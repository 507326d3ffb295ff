use serde::Deserialize;

use crate::errors::ConfigError;

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const MAX_CONCURRENCY: usize = 64;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// KMS refuses pending windows outside 7..=30 days.
pub const DEFAULT_DELETION_WINDOW_DAYS: i64 = 7;
pub const MIN_DELETION_WINDOW_DAYS: i64 = 7;
pub const MAX_DELETION_WINDOW_DAYS: i64 = 30;

/// Top-level config file contents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweeperConfig {
    pub sweep: SweepConfig,
    pub kms: KmsConfig,
}

/// `[sweep]` section: settings shared by every sweeper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Regions swept when the CLI is not given `--region`.
    pub regions: Vec<String>,
    /// Upper bound on concurrent describe/delete calls per sweep.
    pub concurrency: usize,
    /// Requested listing page size. Each resource type clamps it to its own maximum.
    pub page_size: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `[kms]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KmsConfig {
    pub deletion_window_in_days: i64,
}

impl Default for KmsConfig {
    fn default() -> Self {
        Self {
            deletion_window_in_days: DEFAULT_DELETION_WINDOW_DAYS,
        }
    }
}

impl SweeperConfig {
    /// Apply CLI overrides. Empty `regions` and `None` keep the file values.
    pub fn with_overrides(mut self, regions: Vec<String>, concurrency: Option<usize>) -> Self {
        if !regions.is_empty() {
            self.sweep.regions = regions;
        }
        if let Some(concurrency) = concurrency {
            self.sweep.concurrency = concurrency;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.concurrency == 0 || self.sweep.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "sweep.concurrency must be between 1 and {}, got {}",
                    MAX_CONCURRENCY, self.sweep.concurrency
                ),
            });
        }

        if self.sweep.page_size == 0 {
            return Err(ConfigError::InvalidConfiguration {
                message: "sweep.page_size must be greater than 0".to_string(),
            });
        }

        if let Some(region) = self.sweep.regions.iter().find(|r| r.trim().is_empty()) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("sweep.regions contains an empty region name: {:?}", region),
            });
        }

        let window = self.kms.deletion_window_in_days;
        if !(MIN_DELETION_WINDOW_DAYS..=MAX_DELETION_WINDOW_DAYS).contains(&window) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "kms.deletion_window_in_days must be between {} and {}, got {}",
                    MIN_DELETION_WINDOW_DAYS, MAX_DELETION_WINDOW_DAYS, window
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SweeperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sweep.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.kms.deletion_window_in_days, 7);
        assert!(config.sweep.regions.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SweeperConfig = toml::from_str(
            r#"
            [sweep]
            regions = ["us-west-2", "eu-west-1"]
            "#,
        )
        .unwrap();
        assert_eq!(config.sweep.regions, vec!["us-west-2", "eu-west-1"]);
        assert_eq!(config.sweep.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.kms, KmsConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<SweeperConfig, _> = toml::from_str("[sweep]\nworkers = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = SweeperConfig::default().with_overrides(vec![], Some(0));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sweep.concurrency"));
    }

    #[test]
    fn test_deletion_window_out_of_range_rejected() {
        let mut config = SweeperConfig::default();
        config.kms.deletion_window_in_days = 31;
        assert!(config.validate().is_err());

        config.kms.deletion_window_in_days = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_region_rejected() {
        let config = SweeperConfig::default().with_overrides(vec!["  ".to_string()], None);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = SweeperConfig::default();
        config.sweep.regions = vec!["us-east-1".to_string()];

        let unchanged = config.clone().with_overrides(vec![], None);
        assert_eq!(unchanged.sweep.regions, vec!["us-east-1"]);

        let overridden = config.with_overrides(vec!["ap-south-1".to_string()], Some(2));
        assert_eq!(overridden.sweep.regions, vec!["ap-south-1"]);
        assert_eq!(overridden.sweep.concurrency, 2);
    }
}
