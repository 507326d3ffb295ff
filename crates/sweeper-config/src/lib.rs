//! Configuration for sweeper runs.
//!
//! Values come from a TOML file (see [`config_path`]) and fall back to
//! defaults when no file exists. CLI flags are layered on top with
//! [`SweeperConfig::with_overrides`].

mod errors;
mod loading;
mod types;

pub use errors::ConfigError;
pub use loading::{CONFIG_ENV_VAR, config_path, load, load_from};
pub use types::{
    DEFAULT_CONCURRENCY, DEFAULT_DELETION_WINDOW_DAYS, DEFAULT_PAGE_SIZE, KmsConfig,
    MAX_CONCURRENCY, MAX_DELETION_WINDOW_DAYS, MIN_DELETION_WINDOW_DAYS, SweepConfig,
    SweeperConfig,
};
