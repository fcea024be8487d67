//! Filesystem repository for the classifier artifact and its feature columns.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::config::AppCfg;
use crate::common::error::{DispatchError, DispatchResult};
use crate::common::ids::SimpleHash;

use super::domain::{ModelArtifacts, ModelRepo, ModelVersion};
use super::linear::{LinearClassifier, ModelArtifact};

pub const MODEL_FILE: &str = "call_forecasting_model.json";
pub const FEATURE_COLUMNS_FILE: &str = "model_feature_columns.json";

/// Reads both artifacts from one model directory.
pub struct FsModelRepo {
    root: PathBuf,
}

impl FsModelRepo {
    pub fn new(cfg: &AppCfg) -> Self {
        Self::at(&cfg.model_dir)
    }

    pub fn at(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read(&self, file: &str) -> DispatchResult<Vec<u8>> {
        let path = self.root.join(file);
        fs::read(&path).map_err(|err| DispatchError::io(&path.display().to_string(), err))
    }
}

impl ModelRepo for FsModelRepo {
    fn load(&self) -> DispatchResult<ModelArtifacts> {
        let model_bytes = self.read(MODEL_FILE)?;
        let column_bytes = self.read(FEATURE_COLUMNS_FILE)?;

        let artifact: ModelArtifact = serde_json::from_slice(&model_bytes)
            .map_err(|err| DispatchError::config(format!("{MODEL_FILE} is malformed: {err}")))?;
        let feature_columns: Vec<String> = serde_json::from_slice(&column_bytes).map_err(|err| {
            DispatchError::config(format!("{FEATURE_COLUMNS_FILE} is malformed: {err}"))
        })?;

        let mut hash = SimpleHash::new();
        hash.update(&model_bytes);
        hash.update(&column_bytes);

        let version = ModelVersion {
            name: artifact.name.clone(),
            version: artifact.version.clone(),
            fingerprint: hash.finish_hex(),
        };
        let classifier = LinearClassifier::from_artifact(artifact)?;

        Ok(ModelArtifacts {
            version,
            feature_columns,
            classifier: Box::new(classifier),
        })
    }
}
