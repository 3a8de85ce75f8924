//! Shared configuration and async plumbing for the coursescope crates.

pub mod app_config;
pub mod config;
pub mod deadline;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deadline::{with_deadline, DeadlineElapsed};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
