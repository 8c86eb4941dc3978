mod common;

use ofcurve_core::models::InputKind;
use ofcurve_engine::curve::Domain;
use ofcurve_engine::error::EngineError;
use ofcurve_engine::primary::{default_primary, primary_candidates, resolve_primary};
use serde_json::json;

use common::formula;

#[test]
fn candidates_are_sige_and_dose_inputs_in_order() {
    let milk = formula("milk_ed");
    let names: Vec<_> = primary_candidates(&milk).iter().map(|i| i.name()).collect();
    assert_eq!(names, ["sIgE_milk", "dose"]);

    let egg = formula("egg_ofc");
    let names: Vec<_> = primary_candidates(&egg).iter().map(|i| i.name()).collect();
    assert_eq!(names, ["sIgE_egg"]);
}

#[test]
fn marked_primary_wins_over_declaration_order() {
    let wheat = formula("wheat_calc");
    let candidates = primary_candidates(&wheat);
    assert_eq!(candidates[0].name(), "sIgE_wheat");
    assert_eq!(default_primary(&candidates).unwrap().name(), "sIgE_omega5");
}

#[test]
fn first_candidate_without_marker() {
    let milk = formula("milk_ed");
    let candidates = primary_candidates(&milk);
    assert_eq!(default_primary(&candidates).unwrap().name(), "sIgE_milk");
}

#[test]
fn no_candidates_means_no_default() {
    let peanut = formula("peanut_score");
    assert!(primary_candidates(&peanut).is_empty());
    assert!(default_primary(&[]).is_none());
    assert!(matches!(
        resolve_primary(&peanut, None),
        Err(EngineError::Configuration { formula, .. }) if formula == "peanut_score"
    ));
}

#[test]
fn resolves_beta_and_domain_for_default() {
    let egg = formula("egg_ofc");
    let primary = resolve_primary(&egg, None).unwrap();
    assert_eq!(primary.input.name(), "sIgE_egg");
    assert_eq!(primary.beta_key, "LogsIgE_egg");
    assert_eq!(primary.beta, 1.5);
    assert_eq!(primary.domain, Domain::SPECIFIC_IGE);
}

#[test]
fn switching_to_dose_rederives_domain() {
    let milk = formula("milk_ed");
    let primary = resolve_primary(&milk, Some("dose")).unwrap();
    assert_eq!(primary.input.kind(), InputKind::ProteinDose);
    assert_eq!(primary.beta_key, "Logdose");
    assert_eq!(primary.beta, 0.8);
    assert_eq!(primary.domain, Domain::PROTEIN_DOSE);
}

#[test]
fn requesting_a_non_candidate_is_a_configuration_error() {
    let egg = formula("egg_ofc");
    let err = resolve_primary(&egg, Some("age")).unwrap_err();
    assert!(err.to_string().contains("egg_ofc"));
    assert!(err.to_string().contains("age"));

    let err = resolve_primary(&egg, Some("nope")).unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn missing_primary_beta_is_a_configuration_error() {
    let f: ofcurve_core::models::Formula = serde_json::from_value(json!({
        "name": "case_mismatch",
        "title": "x",
        "shorttitle": "x",
        "foodtype": "other",
        "inputs": [{ "type": "sIgE", "name": "sIgE_x", "mode": "primary" }],
        "output": { "mode": "ofc", "result": { "intercept": 0.0, "beta": { "logsige_x": 1.0 } } }
    }))
    .unwrap();
    let err = resolve_primary(&f, None).unwrap_err();
    assert_eq!(
        err,
        EngineError::Configuration {
            formula: "case_mismatch".to_string(),
            detail: "beta coefficient 'LogsIgE_x' for primary input 'sIgE_x' is missing"
                .to_string(),
        }
    );
}
