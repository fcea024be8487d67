//! Hospitals, their units, and the static attributes the feature builder reads.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::common::error::{DispatchError, DispatchResult};
use crate::common::ids::{HospitalId, UnitId};

/// Broad unit type, one-hot encoded as `unit_type_<kind>`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    MedSurg,
    Icu,
    StepDown,
    Pediatric,
    Maternity,
    Behavioral,
    Other,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::MedSurg => "med_surg",
            UnitKind::Icu => "icu",
            UnitKind::StepDown => "step_down",
            UnitKind::Pediatric => "pediatric",
            UnitKind::Maternity => "maternity",
            UnitKind::Behavioral => "behavioral",
            UnitKind::Other => "other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: UnitKind,
    pub floor: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: HospitalId,
    #[serde(default)]
    pub name: Option<String>,
    pub units: Vec<Unit>,
}

/// Lookup contract for the external unit directory.
pub trait UnitDirectory: Send + Sync {
    fn unit(&self, id: &UnitId) -> Option<&Unit>;
    /// Member units of a hospital in directory order; empty when unknown.
    fn units_of(&self, hospital: &HospitalId) -> Vec<&Unit>;
}

/// In-memory directory built from the directory file.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    hospitals: Vec<Hospital>,
    units: HashMap<UnitId, (usize, usize)>,
}

impl StaticDirectory {
    /// Index the hospitals. Hospital ids must be unique, and unit ids must be
    /// unique across all hospitals.
    pub fn new(hospitals: Vec<Hospital>) -> DispatchResult<Self> {
        let mut seen = HashSet::new();
        let mut units = HashMap::new();
        for (h, hospital) in hospitals.iter().enumerate() {
            if !seen.insert(&hospital.id) {
                return Err(DispatchError::config(format!(
                    "hospital `{}` is listed more than once in the directory",
                    hospital.id
                )));
            }
            for (u, unit) in hospital.units.iter().enumerate() {
                if units.insert(unit.id.clone(), (h, u)).is_some() {
                    return Err(DispatchError::config(format!(
                        "unit `{}` is listed more than once in the directory",
                        unit.id
                    )));
                }
            }
        }
        Ok(Self { hospitals, units })
    }

    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }
}

impl UnitDirectory for StaticDirectory {
    fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units
            .get(id)
            .map(|(h, u)| &self.hospitals[*h].units[*u])
    }

    fn units_of(&self, hospital: &HospitalId) -> Vec<&Unit> {
        self.hospitals
            .iter()
            .find(|h| &h.id == hospital)
            .map(|h| h.units.iter().collect())
            .unwrap_or_default()
    }
}
