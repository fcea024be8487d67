//! Whole-hospital forecasts built from the forecasts of every member unit.

use std::time::Instant;

use crate::common::error::{DispatchCode, DispatchError, DispatchResult};
use crate::common::ids::{HospitalId, UnitId};
use crate::common::log;

use super::domain::{CategoryCounts, CensusInput, Horizon, HospitalForecast, HourlyPrediction};
use super::service::ForecastEngine;

/// Sum the hourly forecasts of every unit in the hospital, aligned by offset.
///
/// Every member unit and census is validated before any unit is forecast. A
/// failure in any member aborts the whole aggregation.
pub fn forecast_hospital(
    engine: &ForecastEngine<'_>,
    hospital_id: &HospitalId,
    census: &CensusInput,
    horizon: &Horizon,
) -> DispatchResult<HospitalForecast> {
    let start = Instant::now();
    let result = aggregate(engine, hospital_id, census, horizon);
    let code = match &result {
        Ok(_) => DispatchCode::Ok,
        Err(err) => err.code(),
    };
    log::event("aggregate", "forecast_hospital", code, start.elapsed().as_millis());
    result
}

fn aggregate(
    engine: &ForecastEngine<'_>,
    hospital_id: &HospitalId,
    census: &CensusInput,
    horizon: &Horizon,
) -> DispatchResult<HospitalForecast> {
    let members = engine.directory().units_of(hospital_id);
    if members.is_empty() {
        return Err(DispatchError::EmptyHospital(hospital_id.to_string()));
    }

    if let CensusInput::PerUnit(map) = census {
        if let Some(stray) = map.keys().find(|id| !members.iter().any(|u| &u.id == *id)) {
            return Err(DispatchError::UnknownUnit(stray.to_string()));
        }
    }

    let plan = members
        .iter()
        .map(|unit| -> DispatchResult<_> {
            let unit_census = census.for_unit(&unit.id)?;
            engine.builder().validate(&unit.id, &unit_census)?;
            Ok((unit.id.clone(), unit_census))
        })
        .collect::<DispatchResult<Vec<_>>>()?;

    let forecasts = plan
        .iter()
        .map(|(unit_id, unit_census)| engine.forecast_unit(unit_id, unit_census, horizon))
        .collect::<DispatchResult<Vec<_>>>()?;

    let hours = horizon
        .slots()
        .enumerate()
        .map(|(idx, slot)| {
            let counts = forecasts
                .iter()
                .fold(CategoryCounts::zero(), |acc, unit| acc + *unit.hours[idx].counts());
            HourlyPrediction::new(slot, counts)
        })
        .collect();

    Ok(HospitalForecast {
        hospital_id: hospital_id.clone(),
        units: plan.into_iter().map(|(id, _)| id).collect::<Vec<UnitId>>(),
        hours,
    })
}
