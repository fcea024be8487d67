//! Domain types for trained classifier artifacts.

use serde::Serialize;

use crate::common::error::DispatchResult;

/// Identity of a loaded artifact, reported with every forecast.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ModelVersion {
    pub name: String,
    pub version: String,
    /// Hash over the artifact and feature column bytes.
    pub fingerprint: String,
}

/// Raw classifier output, one value per declared output label.
#[derive(Clone, Debug, PartialEq)]
pub enum RawPrediction {
    /// Direct expected call counts.
    Counts(Vec<f64>),
    /// Category shares scaled by an expected total call volume.
    Shares {
        probabilities: Vec<f64>,
        expected_total: f64,
    },
}

impl RawPrediction {
    pub fn width(&self) -> usize {
        match self {
            RawPrediction::Counts(values) => values.len(),
            RawPrediction::Shares { probabilities, .. } => probabilities.len(),
        }
    }

    /// Per-output expected counts before clipping. NaN is passed through so
    /// that it is rejected downstream rather than masked.
    pub fn expected_counts(&self) -> Vec<f64> {
        match self {
            RawPrediction::Counts(values) => values.clone(),
            RawPrediction::Shares {
                probabilities,
                expected_total,
            } => {
                let volume = if *expected_total < 0.0 {
                    0.0
                } else {
                    *expected_total
                };
                probabilities.iter().map(|p| p * volume).collect()
            }
        }
    }
}

/// A trained classifier treated as a pure function of its feature vector.
pub trait CallClassifier: Send + Sync {
    /// Number of features expected per prediction.
    fn input_width(&self) -> usize;
    /// Output labels, in the order values are emitted.
    fn output_labels(&self) -> &[String];
    fn predict(&self, features: &[f64]) -> DispatchResult<RawPrediction>;
}

/// A classifier together with the feature columns it was trained on.
pub struct ModelArtifacts {
    pub version: ModelVersion,
    pub feature_columns: Vec<String>,
    pub classifier: Box<dyn CallClassifier>,
}

/// Source of model artifacts.
pub trait ModelRepo {
    fn load(&self) -> DispatchResult<ModelArtifacts>;
}
