//! Feature schema registry and the loaded classifier it is paired with.
//!
//! Both are built once from the model artifacts and never mutated. The
//! schema length must equal the classifier input width and every output
//! label must name a call category, otherwise loading fails.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::common::error::{DispatchCode, DispatchError, DispatchResult};
use crate::common::log;
use crate::features::domain::FeatureVector;
use crate::inference::domain::{CallCategory, CategoryCounts};

use super::domain::{CallClassifier, ModelArtifacts, ModelRepo, ModelVersion};

/// Ordered feature names a classifier was trained on.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSchema {
    names: Arc<[String]>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> DispatchResult<Self> {
        if names.is_empty() {
            return Err(DispatchError::config("feature schema is empty"));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(DispatchError::config(format!(
                    "feature schema entry {idx} is blank"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(DispatchError::config(format!(
                    "feature schema lists `{name}` twice"
                )));
            }
        }
        Ok(Self {
            names: Arc::from(names),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn shared_names(&self) -> &Arc<[String]> {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read-only pairing of schema and classifier.
pub struct ModelRegistry {
    version: ModelVersion,
    schema: FeatureSchema,
    classifier: Box<dyn CallClassifier>,
    output_categories: Vec<CallCategory>,
}

impl ModelRegistry {
    /// Load artifacts from the repository and validate their pairing.
    pub fn load(repo: &dyn ModelRepo) -> DispatchResult<Self> {
        let start = Instant::now();
        let result = repo.load().and_then(Self::from_artifacts);
        let elapsed = start.elapsed().as_millis();
        match &result {
            Ok(registry) => {
                log::event("model", "load", DispatchCode::Ok, elapsed);
                ::log::info!(
                    target: "model",
                    "loaded {} {} ({}) with {} features",
                    registry.version.name,
                    registry.version.version,
                    registry.version.fingerprint,
                    registry.schema.len()
                );
            }
            Err(err) => {
                log::event("model", "load", err.code(), elapsed);
                ::log::error!(target: "model", "{err}");
            }
        }
        result
    }

    pub fn from_artifacts(artifacts: ModelArtifacts) -> DispatchResult<Self> {
        let ModelArtifacts {
            version,
            feature_columns,
            classifier,
        } = artifacts;

        let schema = FeatureSchema::new(feature_columns)?;
        if schema.len() != classifier.input_width() {
            return Err(DispatchError::config(format!(
                "feature schema has {} columns but the classifier expects {}",
                schema.len(),
                classifier.input_width()
            )));
        }

        let output_categories = classifier
            .output_labels()
            .iter()
            .map(|label| {
                CallCategory::from_model_label(label).ok_or_else(|| {
                    DispatchError::config(format!("model output `{label}` is not a call category"))
                })
            })
            .collect::<DispatchResult<Vec<_>>>()?;
        if output_categories.is_empty() {
            return Err(DispatchError::config("classifier declares no outputs"));
        }

        Ok(Self {
            version,
            schema,
            classifier,
            output_categories,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn version(&self) -> &ModelVersion {
        &self.version
    }

    /// Run the classifier on one vector and fold its outputs into counts.
    pub fn predict(&self, features: &FeatureVector) -> DispatchResult<CategoryCounts> {
        features.conforms_to(&self.schema)?;
        let raw = self.classifier.predict(features.values())?;
        if raw.width() != self.output_categories.len() {
            return Err(DispatchError::inference(format!(
                "classifier emitted {} outputs, artifact declares {}",
                raw.width(),
                self.output_categories.len()
            )));
        }

        let mut folded = [0.0; CallCategory::COUNT];
        for (category, value) in self.output_categories.iter().zip(raw.expected_counts()) {
            if !value.is_finite() {
                return Err(DispatchError::inference(format!(
                    "non-finite output {value} for {}",
                    category.as_str()
                )));
            }
            folded[category.index()] += value.max(0.0);
        }
        CategoryCounts::clipped(folded)
    }
}
