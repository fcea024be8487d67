//! Error handling primitives shared across the forecast pipeline.

use thiserror::Error;

/// Stable error codes that cross the FFI boundary.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DispatchCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Model artifact, feature schema, unit directory or config is unusable.
    FatalConfiguration = 1,
    /// Unit is not in the directory, the hospital, or the training data.
    UnknownUnit = 2,
    /// A census figure is negative or missing.
    InvalidCensus = 3,
    /// Hospital resolves to no units.
    EmptyHospital = 4,
    /// Classifier failed or produced unusable output.
    ModelInference = 5,
    /// Request failed validation outside of unit/census checks.
    InvalidRequest = 6,
    /// Built feature vector disagrees with the registered schema.
    FeatureMismatch = 7,
}

/// Canonical error type for the crate.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("fatal configuration: {0}")]
    FatalConfiguration(String),
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("invalid census for unit `{unit}`: {reason}")]
    InvalidCensus { unit: String, reason: String },
    #[error("hospital `{0}` has no resolvable units")]
    EmptyHospital(String),
    #[error("model inference failed: {0}")]
    ModelInference(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("feature vector does not match schema: {0}")]
    FeatureMismatch(String),
}

/// Result alias used throughout the crate.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// Machine parsable code for this error.
    pub fn code(&self) -> DispatchCode {
        match self {
            DispatchError::FatalConfiguration(_) => DispatchCode::FatalConfiguration,
            DispatchError::UnknownUnit(_) => DispatchCode::UnknownUnit,
            DispatchError::InvalidCensus { .. } => DispatchCode::InvalidCensus,
            DispatchError::EmptyHospital(_) => DispatchCode::EmptyHospital,
            DispatchError::ModelInference(_) => DispatchCode::ModelInference,
            DispatchError::InvalidRequest(_) => DispatchCode::InvalidRequest,
            DispatchError::FeatureMismatch(_) => DispatchCode::FeatureMismatch,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        DispatchError::FatalConfiguration(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        DispatchError::InvalidRequest(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        DispatchError::ModelInference(msg.into())
    }

    pub fn census(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchError::InvalidCensus {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an IO failure on a named artifact as a configuration error.
    pub fn io(what: &str, err: std::io::Error) -> Self {
        DispatchError::FatalConfiguration(format!("cannot read {what}: {err}"))
    }
}
