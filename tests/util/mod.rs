//! On-disk fixtures shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use dispatch_forecast::common::config::{AppCfg, LOG_LEVEL_VAR, MODEL_DIR_VAR, UNIT_DIRECTORY_VAR};
use dispatch_forecast::model::repo_fs::{FEATURE_COLUMNS_FILE, MODEL_FILE};
use dispatch_forecast::Forecaster;
use serde_json::{json, Value};
use tempfile::TempDir;

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
    "unit_med-3",
    "unit_icu-5",
    "unit_peds-1",
];

pub const TRAINED_UNITS: &[&str] = &["med-3", "icu-5", "peds-1"];

pub fn directory_json() -> Value {
    json!({
        "hospitals": [
            {
                "id": "general",
                "name": "General Hospital",
                "units": [
                    {"id": "med-3", "name": "Anonymized Unit A", "kind": "med_surg", "floor": 3},
                    {"id": "icu-5", "name": "Anonymized Unit B", "kind": "icu", "floor": 5},
                    {"id": "peds-1", "name": "Anonymized Unit C", "kind": "pediatric", "floor": 1}
                ]
            },
            {"id": "annex", "units": [{"id": "obs-2", "kind": "maternity", "floor": 2}]},
            {"id": "empty", "units": []}
        ]
    })
}

fn weight(column: &str, row: usize) -> f64 {
    match column {
        "hour_of_day" => 0.015 * row as f64,
        "rooms_with_patients" => 0.05 + 0.01 * row as f64,
        "unplugged_rooms_with_patients" => 0.2,
        "low_battery_rooms_with_patients" => 0.1,
        "is_weekend" => -0.25,
        "unit_type_icu" => 0.6,
        "unit_floor" => -0.04,
        _ => 0.0,
    }
}

/// Legacy six-output counts model.
pub fn linear_model_json() -> Value {
    let outputs = ["Pain", "Mobility", "Basic Need", "Housekeeping", "Clinical", "Other"];
    let coefficients: Vec<Vec<f64>> = (0..outputs.len())
        .map(|row| COLUMNS.iter().map(|c| weight(c, row)).collect())
        .collect();
    json!({
        "name": "call_forecaster",
        "version": "2024.06.1",
        "outputs": outputs,
        "estimator": {
            "type": "linear",
            "coefficients": coefficients,
            "intercepts": [0.2, 0.1, -0.3, 0.0, 0.4, -1.2]
        }
    })
}

/// Five-output share model with a log-link volume head.
pub fn softmax_model_json() -> Value {
    let outputs = ["Clinical", "Mobility", "Basic Need", "Housekeeping", "Other"];
    let coefficients: Vec<Vec<f64>> = (0..outputs.len())
        .map(|row| COLUMNS.iter().map(|c| weight(c, row) / 2.0).collect())
        .collect();
    let volume: Vec<f64> = COLUMNS
        .iter()
        .map(|c| if *c == "rooms_with_patients" { 0.03 } else { 0.0 })
        .collect();
    json!({
        "name": "call_forecaster",
        "version": "2024.07.0",
        "outputs": outputs,
        "estimator": {
            "type": "softmax_volume",
            "coefficients": coefficients,
            "intercepts": [0.0, 0.1, 0.2, -0.1, -0.5],
            "volume_coefficients": volume,
            "volume_intercept": 0.5,
            "log_link": true
        }
    })
}

pub fn columns_json() -> Value {
    json!(COLUMNS)
}

/// A model directory and unit directory file inside a temp dir.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(model: &Value, columns: &Value) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let models = dir.path().join("models");
        fs::create_dir_all(&models).expect("models dir");
        write_json(&models.join(MODEL_FILE), model);
        write_json(&models.join(FEATURE_COLUMNS_FILE), columns);
        write_json(&dir.path().join("units.json"), &directory_json());
        Self { dir }
    }

    pub fn standard() -> Self {
        Self::new(&linear_model_json(), &columns_json())
    }

    pub fn model_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("models")
    }

    pub fn cfg(&self) -> AppCfg {
        let model_dir = self.model_dir().display().to_string();
        let units = self.dir.path().join("units.json").display().to_string();
        AppCfg::from_lookup(move |key| match key {
            MODEL_DIR_VAR => Some(model_dir.clone()),
            UNIT_DIRECTORY_VAR => Some(units.clone()),
            LOG_LEVEL_VAR => Some("warn".to_string()),
            _ => None,
        })
        .expect("fixture config")
    }

    pub fn forecaster(&self) -> Forecaster {
        Forecaster::from_config(&self.cfg()).expect("fixture forecaster loads")
    }
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_vec_pretty(value).expect("encode")).expect("write fixture");
}
