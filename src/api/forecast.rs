//! Forecast API boundary: one request in, forecast plus presentation out.

use std::time::Instant;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::common::config::AppCfg;
use crate::common::error::{DispatchCode, DispatchError, DispatchResult};
use crate::common::log;
use crate::directory::domain::UnitDirectory;
use crate::directory::repo_fs::FsDirectoryRepo;
use crate::features::domain::FeatureVector;
use crate::inference::aggregate::forecast_hospital;
use crate::inference::domain::{Forecast, ForecastRequest, UnitTarget};
use crate::inference::service::ForecastEngine;
use crate::model::domain::ModelVersion;
use crate::model::registry::ModelRegistry;
use crate::model::repo_fs::FsModelRepo;
use crate::presentation::{self, PresentationSeries};

static FORECASTER: OnceCell<Forecaster> = OnceCell::new();

/// Everything the presentation layer receives for one request.
#[derive(Clone, Debug, Serialize)]
pub struct ForecastResponse {
    pub model: ModelVersion,
    pub forecast: Forecast,
    pub presentation: PresentationSeries,
    /// Named inputs the classifier saw for the first hour of a unit forecast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
}

/// Loaded model registry and unit directory, both read-only.
pub struct Forecaster {
    registry: ModelRegistry,
    directory: Box<dyn UnitDirectory>,
}

impl Forecaster {
    pub fn new(registry: ModelRegistry, directory: impl UnitDirectory + 'static) -> Self {
        Self {
            registry,
            directory: Box::new(directory),
        }
    }

    /// Load the model artifacts and unit directory named by the config.
    pub fn from_config(cfg: &AppCfg) -> DispatchResult<Self> {
        let registry = ModelRegistry::load(&FsModelRepo::new(cfg))?;
        let directory = FsDirectoryRepo::new(cfg).load()?;
        Ok(Self::new(registry, directory))
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn forecast(&self, request: &ForecastRequest) -> DispatchResult<ForecastResponse> {
        let start = Instant::now();
        let result = self.run(request);
        let code = match &result {
            Ok(_) => DispatchCode::Ok,
            Err(err) => {
                ::log::warn!(target: "api", "forecast for `{}` rejected: {err}", request.hospital_id);
                err.code()
            }
        };
        log::event("api", "forecast", code, start.elapsed().as_millis());
        result
    }

    fn run(&self, request: &ForecastRequest) -> DispatchResult<ForecastResponse> {
        let horizon = request.horizon()?;
        let engine = ForecastEngine::new(&self.registry, self.directory.as_ref());

        let (forecast, features) = match &request.target {
            UnitTarget::Unit(unit_id) => {
                let member = self
                    .directory
                    .units_of(&request.hospital_id)
                    .iter()
                    .any(|unit| &unit.id == unit_id);
                if !member {
                    return Err(DispatchError::UnknownUnit(unit_id.to_string()));
                }
                let census = request.census.for_unit(unit_id)?;
                let unit_forecast = engine.forecast_unit(unit_id, &census, &horizon)?;
                let features = horizon
                    .slots()
                    .next()
                    .map(|slot| engine.builder().build_slot(unit_id, slot, &census))
                    .transpose()?;
                (Forecast::Unit(unit_forecast), features)
            }
            UnitTarget::All => {
                let hospital =
                    forecast_hospital(&engine, &request.hospital_id, &request.census, &horizon)?;
                (Forecast::Hospital(hospital), None)
            }
        };

        let presentation = presentation::format(&forecast);
        Ok(ForecastResponse {
            model: self.registry.version().clone(),
            forecast,
            presentation,
            features,
        })
    }
}

/// Load and install the process-wide forecaster. Later calls return the
/// instance installed first without reloading anything.
pub fn init(cfg: &AppCfg) -> DispatchResult<&'static Forecaster> {
    log::init(cfg.log_level);
    FORECASTER.get_or_try_init(|| Forecaster::from_config(cfg))
}

/// Install an already-built forecaster. Fails if one is installed.
pub fn install(forecaster: Forecaster) -> DispatchResult<&'static Forecaster> {
    FORECASTER
        .set(forecaster)
        .map_err(|_| DispatchError::config("forecaster is already installed"))?;
    global().ok_or_else(|| DispatchError::config("forecaster install did not take effect"))
}

pub fn global() -> Option<&'static Forecaster> {
    FORECASTER.get()
}
