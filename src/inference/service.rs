//! Forecast engine: per-unit hourly predictions over a horizon.

use std::time::Instant;

use crate::common::error::{DispatchCode, DispatchResult};
use crate::common::ids::UnitId;
use crate::common::log;
use crate::directory::domain::UnitDirectory;
use crate::features::builder::FeatureBuilder;
use crate::features::domain::Census;
use crate::model::registry::ModelRegistry;

use super::domain::{Horizon, HourlyPrediction, UnitForecast};

/// Drives the feature builder and classifier for one request.
pub struct ForecastEngine<'a> {
    registry: &'a ModelRegistry,
    directory: &'a dyn UnitDirectory,
    builder: FeatureBuilder<'a>,
}

impl<'a> ForecastEngine<'a> {
    pub fn new(registry: &'a ModelRegistry, directory: &'a dyn UnitDirectory) -> Self {
        Self {
            registry,
            directory,
            builder: FeatureBuilder::new(registry.schema(), directory),
        }
    }

    pub fn builder(&self) -> &FeatureBuilder<'a> {
        &self.builder
    }

    pub fn directory(&self) -> &'a dyn UnitDirectory {
        self.directory
    }

    /// Forecast one unit hour by hour, in offset order.
    ///
    /// All feature vectors are built before the first classifier call, so a
    /// bad unit or census never reaches the model.
    pub fn forecast_unit(
        &self,
        unit_id: &UnitId,
        census: &Census,
        horizon: &Horizon,
    ) -> DispatchResult<UnitForecast> {
        let start = Instant::now();
        let result = self.run_unit(unit_id, census, horizon);
        let code = match &result {
            Ok(_) => DispatchCode::Ok,
            Err(err) => err.code(),
        };
        log::event("inference", "forecast_unit", code, start.elapsed().as_millis());
        result
    }

    fn run_unit(
        &self,
        unit_id: &UnitId,
        census: &Census,
        horizon: &Horizon,
    ) -> DispatchResult<UnitForecast> {
        self.builder.validate(unit_id, census)?;
        let vectors = horizon
            .slots()
            .map(|slot| -> DispatchResult<_> {
                Ok((slot, self.builder.build_slot(unit_id, slot, census)?))
            })
            .collect::<DispatchResult<Vec<_>>>()?;

        let hours = vectors
            .iter()
            .map(|(slot, features)| -> DispatchResult<_> {
                Ok(HourlyPrediction::new(*slot, self.registry.predict(features)?))
            })
            .collect::<DispatchResult<Vec<_>>>()?;

        Ok(UnitForecast {
            unit_id: unit_id.clone(),
            hours,
        })
    }
}
