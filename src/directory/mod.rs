//! Unit directory: which units belong to which hospital, and their attributes.

pub mod domain;
pub mod repo_fs;

pub use domain::{Hospital, StaticDirectory, Unit, UnitDirectory, UnitKind};
