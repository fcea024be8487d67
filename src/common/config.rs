//! Runtime configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use log::LevelFilter;

use crate::common::error::{DispatchError, DispatchResult};

pub const MODEL_DIR_VAR: &str = "DISPATCH_MODEL_DIR";
pub const UNIT_DIRECTORY_VAR: &str = "DISPATCH_UNIT_DIRECTORY";
pub const LOG_LEVEL_VAR: &str = "DISPATCH_LOG_LEVEL";

/// Snapshot of configuration values consumed by the pipeline.
#[derive(Clone, Debug)]
pub struct AppCfg {
    /// Directory holding the classifier artifact and its feature columns.
    pub model_dir: PathBuf,
    /// JSON file mapping hospitals to their units.
    pub directory_path: PathBuf,
    pub log_level: LevelFilter,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> DispatchResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> DispatchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let level = env_or(LOG_LEVEL_VAR, "info");
        let log_level = level.parse::<LevelFilter>().map_err(|_| {
            DispatchError::config(format!("{LOG_LEVEL_VAR} has unknown level `{level}`"))
        })?;

        Ok(Self {
            model_dir: PathBuf::from(env_or(MODEL_DIR_VAR, "./app")),
            directory_path: PathBuf::from(env_or(
                UNIT_DIRECTORY_VAR,
                "./app/unit_directory.json",
            )),
            log_level,
        })
    }
}
