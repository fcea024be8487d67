// lib.rs - forecast pipeline for hospital call volume
pub mod api;
pub mod common;
pub mod directory;
pub mod features;
pub mod inference;
pub mod model;
pub mod presentation;

#[cfg(test)]
mod testing;

pub use api::{ForecastResponse, Forecaster};
pub use common::{DispatchCode, DispatchError, DispatchResult};
pub use inference::{CallCategory, Forecast, ForecastRequest};
