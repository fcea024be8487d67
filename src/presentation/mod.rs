//! Result formatting for the dashboard layer.

pub mod domain;
pub mod service;

pub use domain::{CategorySeries, CategoryShare, ForecastTable, PresentationSeries, TableRow};
pub use service::format;
