//! Filesystem-backed unit directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::common::config::AppCfg;
use crate::common::error::{DispatchError, DispatchResult};

use super::domain::{Hospital, StaticDirectory};

#[derive(Deserialize)]
struct DirectoryFile {
    hospitals: Vec<Hospital>,
}

/// Loads the directory JSON file named by `cfg.directory_path`.
pub struct FsDirectoryRepo {
    path: PathBuf,
}

impl FsDirectoryRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::at(&cfg.directory_path)
    }

    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> DispatchResult<StaticDirectory> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|err| DispatchError::io(&self.path.display().to_string(), err))?;
        let file: DirectoryFile = serde_json::from_str(&raw).map_err(|err| {
            DispatchError::config(format!(
                "unit directory {} is malformed: {err}",
                self.path.display()
            ))
        })?;
        let directory = StaticDirectory::new(file.hospitals)?;
        log::debug!(
            target: "directory",
            "loaded {} hospitals from {}",
            directory.hospitals().len(),
            self.path.display()
        );
        Ok(directory)
    }
}
