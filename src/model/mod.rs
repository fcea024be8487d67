//! Model artifacts: loading, the linear estimators, and the schema registry.

pub mod domain;
pub mod linear;
pub mod registry;
pub mod repo_fs;

pub use domain::{CallClassifier, ModelArtifacts, ModelRepo, ModelVersion, RawPrediction};
pub use registry::{FeatureSchema, ModelRegistry};
