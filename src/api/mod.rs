//! Public entry points: the Rust forecast boundary and its C ABI.

pub mod ffi;
pub mod forecast;

pub use forecast::{global, init, install, ForecastResponse, Forecaster};
