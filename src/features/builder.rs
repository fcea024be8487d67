//! Builds schema-ordered feature vectors from (unit, hour, census).
//!
//! Every vector is assembled by walking the registered schema, so names and
//! order match it by construction. Features that cannot be derived from the
//! request default to 0.0.

use std::collections::HashSet;

use crate::common::error::{DispatchError, DispatchResult};
use crate::common::ids::UnitId;
use crate::directory::domain::{Unit, UnitDirectory};
use crate::inference::domain::HourSlot;
use crate::model::registry::FeatureSchema;

use super::domain::{Census, FeatureVector};

pub const HOUR_OF_DAY: &str = "hour_of_day";
pub const DAY_OF_WEEK: &str = "day_of_week";
pub const IS_WEEKEND: &str = "is_weekend";
pub const UNIT_FLOOR: &str = "unit_floor";
/// One-hot prefix for unit kinds.
pub const UNIT_KIND_PREFIX: &str = "unit_type_";
/// One-hot prefix for unit identity. A `unit_<id>` column only counts as an
/// identity column when `<id>` names a unit in the directory; any other
/// `unit_*` column is a feature this builder cannot derive.
pub const UNIT_PREFIX: &str = "unit_";

pub struct FeatureBuilder<'a> {
    schema: &'a FeatureSchema,
    directory: &'a dyn UnitDirectory,
    /// Directory units with an identity column in the schema. Empty when the
    /// model was trained without unit identity.
    trained_units: HashSet<&'a str>,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(schema: &'a FeatureSchema, directory: &'a dyn UnitDirectory) -> Self {
        let trained_units = schema
            .names()
            .iter()
            .filter(|name| !name.starts_with(UNIT_KIND_PREFIX) && name.as_str() != UNIT_FLOOR)
            .filter_map(|name| name.strip_prefix(UNIT_PREFIX))
            .filter(|id| directory.unit(&UnitId::new(*id)).is_some())
            .collect();
        Self {
            schema,
            directory,
            trained_units,
        }
    }

    /// Resolve a unit, rejecting ones the directory or the model never saw.
    pub fn resolve_unit(&self, unit_id: &UnitId) -> DispatchResult<&'a Unit> {
        let unit = self
            .directory
            .unit(unit_id)
            .ok_or_else(|| DispatchError::UnknownUnit(unit_id.to_string()))?;
        if !self.trained_units.is_empty() && !self.trained_units.contains(unit_id.as_str()) {
            return Err(DispatchError::UnknownUnit(unit_id.to_string()));
        }
        Ok(unit)
    }

    /// Run every request-level check for one unit without building anything.
    pub fn validate(&self, unit_id: &UnitId, census: &Census) -> DispatchResult<&'a Unit> {
        let unit = self.resolve_unit(unit_id)?;
        census.validate(unit_id)?;
        Ok(unit)
    }

    pub fn build(&self, unit_id: &UnitId, hour: u32, census: &Census) -> DispatchResult<FeatureVector> {
        self.build_slot(unit_id, HourSlot::at(hour), census)
    }

    pub fn build_slot(
        &self,
        unit_id: &UnitId,
        slot: HourSlot,
        census: &Census,
    ) -> DispatchResult<FeatureVector> {
        let unit = self.validate(unit_id, census)?;
        let slot = HourSlot {
            hour: slot.hour % 24,
            ..slot
        };
        let values = self
            .schema
            .names()
            .iter()
            .map(|name| {
                derive(name, unit, slot, census).unwrap_or_else(|| {
                    log::trace!(target: "features", "`{name}` not derivable, using 0");
                    0.0
                })
            })
            .collect();
        Ok(FeatureVector::new(self.schema.shared_names().clone(), values))
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn derive(name: &str, unit: &Unit, slot: HourSlot, census: &Census) -> Option<f64> {
    let day = slot.weekday.map(|d| d.num_days_from_monday());
    match name {
        HOUR_OF_DAY => return Some(f64::from(slot.hour)),
        DAY_OF_WEEK => return day.map(f64::from),
        IS_WEEKEND => return day.map(|d| indicator(d >= 5)),
        UNIT_FLOOR => return Some(f64::from(unit.floor)),
        _ => {}
    }
    if let Some((_, value)) = census.features().iter().find(|(n, _)| *n == name) {
        return Some(*value as f64);
    }
    if let Some(kind) = name.strip_prefix(UNIT_KIND_PREFIX) {
        return Some(indicator(kind == unit.kind.as_str()));
    }
    if let Some(id) = name.strip_prefix(UNIT_PREFIX) {
        return Some(indicator(id == unit.id.as_str()));
    }
    None
}
