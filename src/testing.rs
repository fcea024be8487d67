//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::common::error::DispatchResult;
use crate::common::ids::{HospitalId, UnitId};
use crate::directory::domain::{Hospital, StaticDirectory, Unit, UnitKind};
use crate::model::domain::{CallClassifier, ModelArtifacts, ModelVersion, RawPrediction};
use crate::model::linear::{Estimator, LinearClassifier, ModelArtifact};
use crate::model::registry::ModelRegistry;

pub const COLUMNS: &[&str] = &[
    "hour_of_day",
    "day_of_week",
    "is_weekend",
    "rooms_with_patients",
    "suspended_rooms_with_patients",
    "offline_rooms_with_patients",
    "unplugged_rooms_with_patients",
    "low_battery_rooms_with_patients",
    "unit_floor",
    "unit_type_med_surg",
    "unit_type_icu",
    "unit_type_pediatric",
    "unit_med-3",
    "unit_icu-5",
    "unit_peds-1",
    "staffing_ratio",
];

pub const OUTPUTS: &[&str] = &[
    "Pain",
    "Mobility",
    "Basic Need",
    "Housekeeping",
    "Clinical",
    "Other",
];

fn unit(id: &str, kind: UnitKind, floor: i32) -> Unit {
    Unit {
        id: UnitId::new(id),
        name: None,
        kind,
        floor,
    }
}

/// `general` has three trained units, `annex` has one unit the model never
/// saw, `empty` has none.
pub fn directory() -> StaticDirectory {
    StaticDirectory::new(vec![
        Hospital {
            id: HospitalId::new("general"),
            name: Some("General Hospital".into()),
            units: vec![
                unit("med-3", UnitKind::MedSurg, 3),
                unit("icu-5", UnitKind::Icu, 5),
                unit("peds-1", UnitKind::Pediatric, 1),
            ],
        },
        Hospital {
            id: HospitalId::new("annex"),
            name: None,
            units: vec![unit("obs-2", UnitKind::Maternity, 2)],
        },
        Hospital {
            id: HospitalId::new("empty"),
            name: None,
            units: vec![],
        },
    ])
    .expect("fixture directory is valid")
}

/// Linear counts model whose outputs depend on hour, census and unit.
pub fn artifact() -> ModelArtifact {
    let coefficients = (0..OUTPUTS.len())
        .map(|row| {
            COLUMNS
                .iter()
                .map(|column| match *column {
                    "hour_of_day" => 0.02 * row as f64,
                    "rooms_with_patients" => 0.04 + 0.01 * row as f64,
                    "unplugged_rooms_with_patients" => 0.1,
                    "is_weekend" => -0.3,
                    "unit_type_icu" => 0.5,
                    "unit_floor" => -0.05,
                    _ => 0.0,
                })
                .collect()
        })
        .collect();
    ModelArtifact {
        name: "call_forecaster".into(),
        version: "test".into(),
        outputs: OUTPUTS.iter().map(|o| o.to_string()).collect(),
        estimator: Estimator::Linear {
            coefficients,
            intercepts: vec![0.2, 0.1, -0.4, 0.0, 0.3, -1.5],
        },
    }
}

pub fn registry() -> ModelRegistry {
    let classifier = LinearClassifier::from_artifact(artifact()).expect("fixture artifact is valid");
    ModelRegistry::from_artifacts(ModelArtifacts {
        version: ModelVersion {
            name: "call_forecaster".into(),
            version: "test".into(),
            fingerprint: "00000000".into(),
        },
        feature_columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        classifier: Box::new(classifier),
    })
    .unwrap_or_else(|err| panic!("fixture registry is valid: {err}"))
}

/// Wraps a classifier and counts how often it is invoked.
pub struct CountingClassifier {
    inner: LinearClassifier,
    pub calls: Arc<AtomicUsize>,
}

impl CallClassifier for CountingClassifier {
    fn input_width(&self) -> usize {
        self.inner.input_width()
    }

    fn output_labels(&self) -> &[String] {
        self.inner.output_labels()
    }

    fn predict(&self, features: &[f64]) -> DispatchResult<RawPrediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict(features)
    }
}

/// Registry over the fixture model plus a handle on its call counter.
pub fn counting_registry() -> (ModelRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let classifier = CountingClassifier {
        inner: LinearClassifier::from_artifact(artifact()).expect("fixture artifact is valid"),
        calls: calls.clone(),
    };
    let registry = ModelRegistry::from_artifacts(ModelArtifacts {
        version: ModelVersion {
            name: "call_forecaster".into(),
            version: "counting".into(),
            fingerprint: "00000000".into(),
        },
        feature_columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        classifier: Box::new(classifier),
    })
    .unwrap_or_else(|err| panic!("fixture registry is valid: {err}"));
    (registry, calls)
}
