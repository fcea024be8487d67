//! Feature construction for the call classifier.

pub mod builder;
pub mod domain;

pub use builder::FeatureBuilder;
pub use domain::{Census, FeatureVector};
