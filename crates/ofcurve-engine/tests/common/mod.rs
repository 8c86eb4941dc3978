#![allow(dead_code)]

use ofcurve_core::catalog::Catalog;
use ofcurve_core::models::Formula;
use ofcurve_engine::factor::{FactorValue, FactorValues};
use serde_json::json;

pub const FIXTURE: &str = include_str!("../../../ofcurve-core/tests/fixtures/formulas.json");

pub fn catalog() -> Catalog {
    Catalog::from_json_str(FIXTURE).unwrap()
}

pub fn formula(name: &str) -> Formula {
    catalog().get(name).unwrap().clone()
}

/// `intercept = -2.0`, `beta = { LogsIgE_egg: 1.5 }`, primary `sIgE_egg`.
pub fn single_factor_egg() -> Formula {
    serde_json::from_value(json!({
        "name": "egg_single",
        "title": "Egg",
        "shorttitle": "Egg",
        "foodtype": "egg",
        "inputs": [
            { "type": "sIgE", "name": "sIgE_egg", "mode": "primary" }
        ],
        "output": {
            "mode": "ofc",
            "result": { "intercept": -2.0, "beta": { "LogsIgE_egg": 1.5 } }
        }
    }))
    .unwrap()
}

pub fn values(pairs: &[(&str, FactorValue)]) -> FactorValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
