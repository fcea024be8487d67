//! Linear estimators deserialized from the JSON model artifact.
//!
//! Two families are supported: a multi-output linear regressor emitting
//! counts directly, and a softmax category head paired with a separate
//! volume head emitting shares of an expected total.

use serde::Deserialize;

use crate::common::error::{DispatchError, DispatchResult};

use super::domain::{CallClassifier, RawPrediction};

/// On-disk artifact layout.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelArtifact {
    pub name: String,
    pub version: String,
    pub outputs: Vec<String>,
    pub estimator: Estimator,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    SoftmaxVolume {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        volume_coefficients: Vec<f64>,
        volume_intercept: f64,
        #[serde(default)]
        log_link: bool,
    },
}

/// Classifier backed by one linear model per output label.
#[derive(Clone, Debug)]
pub struct LinearClassifier {
    outputs: Vec<String>,
    width: usize,
    estimator: Estimator,
}

impl LinearClassifier {
    /// Validate the artifact shapes and build the classifier.
    pub fn from_artifact(artifact: ModelArtifact) -> DispatchResult<Self> {
        let (coefficients, intercepts) = match &artifact.estimator {
            Estimator::Linear {
                coefficients,
                intercepts,
            }
            | Estimator::SoftmaxVolume {
                coefficients,
                intercepts,
                ..
            } => (coefficients, intercepts),
        };

        if artifact.outputs.is_empty() {
            return Err(DispatchError::config("model artifact declares no outputs"));
        }
        if coefficients.len() != artifact.outputs.len() || intercepts.len() != artifact.outputs.len() {
            return Err(DispatchError::config(format!(
                "model artifact has {} outputs but {} coefficient rows and {} intercepts",
                artifact.outputs.len(),
                coefficients.len(),
                intercepts.len()
            )));
        }

        let width = coefficients[0].len();
        if width == 0 {
            return Err(DispatchError::config("model artifact has empty coefficient rows"));
        }
        if let Some(row) = coefficients.iter().position(|row| row.len() != width) {
            return Err(DispatchError::config(format!(
                "coefficient row {row} has {} entries, expected {width}",
                coefficients[row].len()
            )));
        }
        if let Estimator::SoftmaxVolume {
            volume_coefficients,
            ..
        } = &artifact.estimator
        {
            if volume_coefficients.len() != width {
                return Err(DispatchError::config(format!(
                    "volume head has {} coefficients, expected {width}",
                    volume_coefficients.len()
                )));
            }
        }

        Ok(Self {
            outputs: artifact.outputs,
            width,
            estimator: artifact.estimator,
        })
    }
}

fn dot(weights: &[f64], features: &[f64]) -> f64 {
    weights.iter().zip(features).map(|(w, x)| w * x).sum()
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

impl CallClassifier for LinearClassifier {
    fn input_width(&self) -> usize {
        self.width
    }

    fn output_labels(&self) -> &[String] {
        &self.outputs
    }

    fn predict(&self, features: &[f64]) -> DispatchResult<RawPrediction> {
        if features.len() != self.width {
            return Err(DispatchError::inference(format!(
                "expected {} features, got {}",
                self.width,
                features.len()
            )));
        }

        match &self.estimator {
            Estimator::Linear {
                coefficients,
                intercepts,
            } => Ok(RawPrediction::Counts(
                coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| dot(row, features) + b)
                    .collect(),
            )),
            Estimator::SoftmaxVolume {
                coefficients,
                intercepts,
                volume_coefficients,
                volume_intercept,
                log_link,
            } => {
                let logits: Vec<f64> = coefficients
                    .iter()
                    .zip(intercepts)
                    .map(|(row, b)| dot(row, features) + b)
                    .collect();
                let linear = dot(volume_coefficients, features) + volume_intercept;
                let expected_total = if *log_link { linear.exp() } else { linear };
                Ok(RawPrediction::Shares {
                    probabilities: softmax(&logits),
                    expected_total,
                })
            }
        }
    }
}
