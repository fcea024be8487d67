//! Domain definitions for forecast requests, horizons and hourly predictions.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Index};

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::error::{DispatchError, DispatchResult};
use crate::common::ids::{HospitalId, UnitId};
use crate::features::domain::Census;

/// Closed set of call-type buckets. Cardinality is fixed at five.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallCategory {
    Clinical,
    Mobility,
    BasicNeed,
    Housekeeping,
    Other,
}

impl CallCategory {
    pub const COUNT: usize = 5;

    /// Every category in display order.
    pub const ALL: [CallCategory; CallCategory::COUNT] = [
        CallCategory::Clinical,
        CallCategory::Mobility,
        CallCategory::BasicNeed,
        CallCategory::Housekeeping,
        CallCategory::Other,
    ];

    pub fn index(self) -> usize {
        match self {
            CallCategory::Clinical => 0,
            CallCategory::Mobility => 1,
            CallCategory::BasicNeed => 2,
            CallCategory::Housekeeping => 3,
            CallCategory::Other => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CallCategory::Clinical => "clinical",
            CallCategory::Mobility => "mobility",
            CallCategory::BasicNeed => "basic_need",
            CallCategory::Housekeeping => "housekeeping",
            CallCategory::Other => "other",
        }
    }

    /// Human readable label used by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            CallCategory::Clinical => "Clinical",
            CallCategory::Mobility => "Mobility",
            CallCategory::BasicNeed => "Basic Need",
            CallCategory::Housekeeping => "Housekeeping",
            CallCategory::Other => "Other",
        }
    }

    /// Map a classifier output label onto a category.
    ///
    /// Matching ignores case, spaces and underscores. Older artifacts emit a
    /// separate `Pain` output, which is a clinical call.
    pub fn from_model_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "clinical" | "pain" => Some(CallCategory::Clinical),
            "mobility" => Some(CallCategory::Mobility),
            "basicneed" => Some(CallCategory::BasicNeed),
            "housekeeping" => Some(CallCategory::Housekeeping),
            "other" => Some(CallCategory::Other),
            _ => None,
        }
    }
}

/// Non-negative call counts, one slot per category.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CategoryCounts([f64; CallCategory::COUNT]);

impl CategoryCounts {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build counts from raw values, clipping negatives to zero.
    ///
    /// Non-finite values are rejected; they indicate a broken artifact.
    pub fn clipped(values: [f64; CallCategory::COUNT]) -> DispatchResult<Self> {
        let mut out = [0.0; CallCategory::COUNT];
        for (slot, (category, value)) in out.iter_mut().zip(CallCategory::ALL.iter().zip(values)) {
            if !value.is_finite() {
                return Err(DispatchError::inference(format!(
                    "non-finite count {value} for {}",
                    category.as_str()
                )));
            }
            *slot = value.max(0.0);
        }
        Ok(Self(out))
    }

    pub fn get(&self, category: CallCategory) -> f64 {
        self.0[category.index()]
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CallCategory, f64)> + '_ {
        CallCategory::ALL.iter().map(move |c| (*c, self.0[c.index()]))
    }
}

impl Index<CallCategory> for CategoryCounts {
    type Output = f64;

    fn index(&self, category: CallCategory) -> &f64 {
        &self.0[category.index()]
    }
}

impl AddAssign for CategoryCounts {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0) {
            *lhs += rhs;
        }
    }
}

impl Add for CategoryCounts {
    type Output = CategoryCounts;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CallCategory::COUNT))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.as_str(), &value)?;
        }
        map.end()
    }
}

/// One hour of the requested range.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HourSlot {
    /// Position in the requested range, starting at 0.
    pub offset: u32,
    /// Wall-clock hour in [0, 23].
    pub hour: u32,
    pub weekday: Option<Weekday>,
}

impl HourSlot {
    /// A standalone slot for the given hour, normalized into [0, 23].
    pub fn at(hour: u32) -> Self {
        Self {
            offset: 0,
            hour: hour % 24,
            weekday: None,
        }
    }

    pub fn on(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }
}

/// Validated forecast range.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Horizon {
    start_hour: u32,
    hours: u32,
    start_day: Option<Weekday>,
}

impl Horizon {
    pub const MAX_HOURS: u32 = 24;

    pub fn new(start_hour: u32, hours: u32) -> DispatchResult<Self> {
        if start_hour > 23 {
            return Err(DispatchError::invalid(format!(
                "start_hour {start_hour} is outside 0-23"
            )));
        }
        if hours == 0 || hours > Self::MAX_HOURS {
            return Err(DispatchError::invalid(format!(
                "horizon_hours {hours} is outside 1-{}",
                Self::MAX_HOURS
            )));
        }
        Ok(Self {
            start_hour,
            hours,
            start_day: None,
        })
    }

    /// Set the weekday of the first forecast hour.
    pub fn starting_on(mut self, day: Option<Weekday>) -> Self {
        self.start_day = day;
        self
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn len(&self) -> usize {
        self.hours as usize
    }

    pub fn is_empty(&self) -> bool {
        self.hours == 0
    }

    /// Slots in offset order; the weekday rolls over past hour 23.
    pub fn slots(&self) -> impl Iterator<Item = HourSlot> + '_ {
        (0..self.hours).map(move |offset| {
            let absolute = self.start_hour + offset;
            let days = absolute / 24;
            HourSlot {
                offset,
                hour: absolute % 24,
                weekday: self
                    .start_day
                    .map(|day| (0..days).fold(day, |d, _| d.succ())),
            }
        })
    }
}

/// Predicted calls for a single hour. `total` always equals the sum of the
/// category counts.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HourlyPrediction {
    offset: u32,
    hour: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    weekday: Option<Weekday>,
    counts: CategoryCounts,
    total: f64,
}

impl HourlyPrediction {
    pub fn new(slot: HourSlot, counts: CategoryCounts) -> Self {
        Self {
            offset: slot.offset,
            hour: slot.hour,
            weekday: slot.weekday,
            total: counts.total(),
            counts,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    pub fn counts(&self) -> &CategoryCounts {
        &self.counts
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

/// Hourly forecast for one unit, in offset order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitForecast {
    pub unit_id: UnitId,
    pub hours: Vec<HourlyPrediction>,
}

/// Offset-aligned sum of every member unit's forecast.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HospitalForecast {
    pub hospital_id: HospitalId,
    pub units: Vec<UnitId>,
    pub hours: Vec<HourlyPrediction>,
}

/// Either shape of pipeline output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Forecast {
    Unit(UnitForecast),
    Hospital(HospitalForecast),
}

impl Forecast {
    pub fn hours(&self) -> &[HourlyPrediction] {
        match self {
            Forecast::Unit(f) => &f.hours,
            Forecast::Hospital(f) => &f.hours,
        }
    }

    /// Identifier of the forecast subject, unit or hospital.
    pub fn subject(&self) -> &str {
        match self {
            Forecast::Unit(f) => f.unit_id.as_str(),
            Forecast::Hospital(f) => f.hospital_id.as_str(),
        }
    }
}

/// Which part of the hospital a request targets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitTarget {
    Unit(UnitId),
    All,
}

/// How census figures are supplied. The choice is explicit in the request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CensusInput {
    /// One figure applied to every unit.
    Shared(Census),
    /// A figure per unit.
    PerUnit(BTreeMap<UnitId, Census>),
}

impl CensusInput {
    /// Census for one unit. A per-unit map without the unit is an error.
    pub fn for_unit(&self, unit: &UnitId) -> DispatchResult<Census> {
        match self {
            CensusInput::Shared(census) => Ok(*census),
            CensusInput::PerUnit(map) => map
                .get(unit)
                .copied()
                .ok_or_else(|| DispatchError::census(unit.as_str(), "no census supplied")),
        }
    }
}

/// Request accepted at the forecast API boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastRequest {
    pub hospital_id: HospitalId,
    pub target: UnitTarget,
    pub census: CensusInput,
    pub start_hour: u32,
    pub horizon_hours: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_day: Option<Weekday>,
}

impl ForecastRequest {
    pub fn horizon(&self) -> DispatchResult<Horizon> {
        Ok(Horizon::new(self.start_hour, self.horizon_hours)?.starting_on(self.start_day))
    }
}
