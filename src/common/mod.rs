//! Shared utilities that glue the pipeline stages together.

pub mod config;
pub mod error;
pub mod ids;
pub mod log;

pub use error::{DispatchCode, DispatchError, DispatchResult};
