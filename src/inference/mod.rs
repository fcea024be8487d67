//! Forecast pipeline: per-unit engine and hospital aggregation.

pub mod aggregate;
pub mod domain;
pub mod service;

pub use aggregate::forecast_hospital;
pub use domain::{
    CallCategory, CategoryCounts, CensusInput, Forecast, ForecastRequest, HospitalForecast,
    Horizon, HourSlot, HourlyPrediction, UnitForecast, UnitTarget,
};
pub use service::ForecastEngine;
