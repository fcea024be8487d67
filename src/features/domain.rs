//! Census input and the schema-ordered feature vector handed to classifiers.

use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::common::error::{DispatchError, DispatchResult};
use crate::common::ids::UnitId;
use crate::model::registry::FeatureSchema;

/// Patient census of a unit plus room-device status counts.
///
/// Fields are signed so that a negative figure reaches validation instead of
/// failing to parse.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "CensusRepr")]
pub struct Census {
    pub rooms_with_patients: i64,
    pub suspended: i64,
    pub offline: i64,
    pub unplugged: i64,
    pub low_battery: i64,
}

/// Accepts either a bare integer or the full object. Status counts may use
/// their feature column names; unknown keys are rejected.
#[derive(Deserialize)]
#[serde(untagged)]
enum CensusRepr {
    Count(i64),
    Full(CensusFields),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CensusFields {
    rooms_with_patients: i64,
    #[serde(default, alias = "suspended_rooms_with_patients")]
    suspended: i64,
    #[serde(default, alias = "offline_rooms_with_patients")]
    offline: i64,
    #[serde(default, alias = "unplugged_rooms_with_patients")]
    unplugged: i64,
    #[serde(default, alias = "low_battery_rooms_with_patients")]
    low_battery: i64,
}

impl From<CensusRepr> for Census {
    fn from(repr: CensusRepr) -> Self {
        match repr {
            CensusRepr::Count(n) => Census::new(n),
            CensusRepr::Full(fields) => Census {
                rooms_with_patients: fields.rooms_with_patients,
                suspended: fields.suspended,
                offline: fields.offline,
                unplugged: fields.unplugged,
                low_battery: fields.low_battery,
            },
        }
    }
}

impl Census {
    /// Census with no rooms in a degraded device state.
    pub fn new(rooms_with_patients: i64) -> Self {
        Self {
            rooms_with_patients,
            ..Self::default()
        }
    }

    /// Feature names paired with their census values.
    pub fn features(&self) -> [(&'static str, i64); 5] {
        [
            ("rooms_with_patients", self.rooms_with_patients),
            ("suspended_rooms_with_patients", self.suspended),
            ("offline_rooms_with_patients", self.offline),
            ("unplugged_rooms_with_patients", self.unplugged),
            ("low_battery_rooms_with_patients", self.low_battery),
        ]
    }

    pub fn validate(&self, unit: &UnitId) -> DispatchResult<()> {
        match self.features().iter().find(|(_, value)| *value < 0) {
            Some((name, value)) => Err(DispatchError::census(
                unit.as_str(),
                format!("{name} is {value}"),
            )),
            None => Ok(()),
        }
    }
}

/// Feature values in the exact order of the registered schema.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureVector {
    names: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub(crate) fn new(names: Arc<[String]>, values: Vec<f64>) -> Self {
        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Check names, order and length against the schema.
    pub fn conforms_to(&self, schema: &FeatureSchema) -> DispatchResult<()> {
        if self.values.len() != self.names.len() {
            return Err(DispatchError::FeatureMismatch(format!(
                "{} values for {} names",
                self.values.len(),
                self.names.len()
            )));
        }
        let expected = schema.names();
        if Arc::ptr_eq(&self.names, schema.shared_names()) {
            return Ok(());
        }
        if self.names.len() != expected.len() {
            return Err(DispatchError::FeatureMismatch(format!(
                "vector has {} features, schema has {}",
                self.names.len(),
                expected.len()
            )));
        }
        match self
            .names
            .iter()
            .zip(expected.iter())
            .position(|(got, want)| got != want)
        {
            Some(idx) => Err(DispatchError::FeatureMismatch(format!(
                "position {idx} is `{}`, schema expects `{}`",
                self.names[idx], expected[idx]
            ))),
            None => Ok(()),
        }
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn census_accepts_bare_integer() {
        let census: Census = serde_json::from_str("25").unwrap();
        assert_eq!(census, Census::new(25));
    }

    #[test]
    fn census_object_defaults_status_counts() {
        let census: Census =
            serde_json::from_str(r#"{"rooms_with_patients": 25, "unplugged": 3}"#).unwrap();
        assert_eq!(census.unplugged, 3);
        assert_eq!(census.offline, 0);
    }

    #[test]
    fn census_object_accepts_feature_column_names() {
        let census: Census = serde_json::from_str(
            r#"{"rooms_with_patients": 25, "offline_rooms_with_patients": 3, "low_battery_rooms_with_patients": 2}"#,
        )
        .unwrap();
        assert_eq!(census.offline, 3);
        assert_eq!(census.low_battery, 2);
        assert_eq!(census.features()[2], ("offline_rooms_with_patients", 3));
    }

    #[test]
    fn census_object_rejects_unknown_keys() {
        let err = serde_json::from_str::<Census>(r#"{"rooms_with_patients": 25, "unpluged": 4}"#);
        assert!(err.is_err());
        assert!(serde_json::from_str::<Census>(r#"{"offline": 1}"#).is_err());
    }

    #[test]
    fn negative_census_is_rejected_with_field_name() {
        let err = Census::new(-1).validate(&UnitId::new("a")).unwrap_err();
        assert_eq!(
            err,
            DispatchError::census("a", "rooms_with_patients is -1")
        );

        let census = Census {
            low_battery: -2,
            ..Census::new(4)
        };
        assert!(census.validate(&UnitId::new("a")).is_err());
    }

    #[test]
    fn conformance_detects_reordering() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into()]).unwrap();
        let swapped = FeatureVector::new(Arc::from(vec!["b".to_string(), "a".to_string()]), vec![0.0, 0.0]);
        let err = swapped.conforms_to(&schema).unwrap_err();
        assert!(matches!(err, DispatchError::FeatureMismatch(_)));

        let same = FeatureVector::new(Arc::from(vec!["a".to_string(), "b".to_string()]), vec![1.0, 2.0]);
        assert!(same.conforms_to(&schema).is_ok());
        assert_eq!(same.get("b"), Some(2.0));
    }

    #[test]
    fn conformance_detects_missing_values() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into()]).unwrap();
        let short = FeatureVector::new(schema.shared_names().clone(), vec![1.0]);
        assert!(short.conforms_to(&schema).is_err());
    }
}
