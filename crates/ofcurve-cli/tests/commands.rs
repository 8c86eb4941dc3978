use std::io::Write;

use ofcurve_cli::commands::{
    check_curve_options, entry_values, list, load_catalog, parse_assignment, render_formula_probability,
    render_prediction, show,
};
use ofcurve_cli::config::AppMode;
use ofcurve_core::catalog::Catalog;
use ofcurve_engine::factor::FactorValue;
use ofcurve_engine::prediction::{PredictionRequest, predict};

const FIXTURE: &str = include_str!("../../ofcurve-core/tests/fixtures/formulas.json");

fn catalog() -> Catalog {
    Catalog::from_json_str(FIXTURE).unwrap()
}

#[test]
fn assignment_keeps_numbers_as_entered_text() {
    assert_eq!(
        parse_assignment("age=7.5").unwrap(),
        ("age".to_string(), FactorValue::Text("7.5".to_string()))
    );
    assert_eq!(
        parse_assignment(" sIgE_egg = 3 ").unwrap(),
        ("sIgE_egg".to_string(), FactorValue::Text("3".to_string()))
    );
}

#[test]
fn assignment_recognizes_flags() {
    assert_eq!(
        parse_assignment("atopic_dermatitis=true").unwrap().1,
        FactorValue::Flag(true)
    );
    assert_eq!(parse_assignment("sex=false").unwrap().1, FactorValue::Flag(false));
}

#[test]
fn assignment_requires_name_and_equals() {
    assert!(parse_assignment("age").is_err());
    assert!(parse_assignment("=3").is_err());
}

#[test]
fn empty_assignment_value_is_empty_text() {
    assert_eq!(parse_assignment("age=").unwrap().1, FactorValue::Text(String::new()));
}

#[test]
fn list_hides_formula_models_in_normal_mode() {
    let catalog = catalog();
    let out = list(&catalog, "en", false, AppMode::Normal);

    assert!(out.starts_with("Available curves:"));
    assert!(out.contains("egg_ofc"));
    assert!(out.contains("milk_ed"));
    assert!(out.contains("wheat_calc"));
    assert!(!out.contains("peanut_score"));
}

#[test]
fn list_all_or_super_mode_includes_formula_models() {
    let catalog = catalog();
    assert!(list(&catalog, "en", true, AppMode::Normal).contains("peanut_score"));
    assert!(list(&catalog, "en", false, AppMode::Super).contains("peanut_score"));
}

#[test]
fn list_uses_requested_language() {
    let out = list(&catalog(), "ja", false, AppMode::Normal);
    assert!(out.starts_with("利用可能な曲線:"));
    assert!(out.contains("卵白OFC陽性確率"));
}

#[test]
fn show_describes_inputs_and_references() {
    let catalog = catalog();
    let out = show(catalog.get("egg_ofc").unwrap(), "en");

    assert!(out.starts_with("Egg white OFC failure (egg_ofc)"));
    assert!(out.contains("(primary)"));
    assert!(out.contains("range 0..18"));
    assert!(out.contains("Primary factors: sIgE_egg (default sIgE_egg)"));
    assert!(out.contains("PMID:12345678 <https://pubmed.ncbi.nlm.nih.gov/12345678>"));
    assert!(out.contains("doi:10.1000/example.1 <https://doi.org/10.1000/example.1>"));
    assert!(out.contains("  Internal data set\n"));
}

#[test]
fn show_lists_dose_presets_and_calc_items() {
    let catalog = catalog();
    let milk = show(catalog.get("milk_ed").unwrap(), "ja");
    assert!(milk.contains("1 mL milk = 33 mg"));
    assert!(milk.contains("牛乳200 mL = 6600 mg"));

    let wheat = show(catalog.get("wheat_calc").unwrap(), "en");
    assert!(wheat.contains("age_months = age * 12"));
    assert!(wheat.contains("(default sIgE_omega5)"));
}

#[test]
fn entry_values_override_defaults() {
    let catalog = catalog();
    let egg = catalog.get("egg_ofc").unwrap();
    let values = entry_values(egg, vec![parse_assignment("age=12").unwrap()]).unwrap();

    assert_eq!(values["age"], FactorValue::Text("12".to_string()));
    assert_eq!(values["IgE"], FactorValue::Text("100".to_string()));
    assert_eq!(values["sex"], FactorValue::Flag(false));
}

#[test]
fn entry_values_reject_unknown_inputs() {
    let catalog = catalog();
    let egg = catalog.get("egg_ofc").unwrap();
    let err = entry_values(egg, vec![parse_assignment("weight=20").unwrap()]).unwrap_err();
    assert!(err.to_string().contains("no input named 'weight'"));
}

#[test]
fn prediction_text_shows_point_and_curve() {
    let catalog = catalog();
    let egg = catalog.get("egg_ofc").unwrap();
    let values = entry_values(egg, Vec::new()).unwrap();
    let request = PredictionRequest {
        formula: "egg_ofc".to_string(),
        values,
        ..PredictionRequest::default()
    };
    let prediction = predict(&catalog, &request).unwrap();
    let out = render_prediction(egg, &prediction, &request.values, "en", AppMode::Normal);

    assert!(out.contains("Probability: 4.3% at Egg white sIgE = 1"));
    assert!(out.contains("axis: 0.01 | 0.10 | 1 | 10 | 100 | 1000"));
    assert!(!out.contains("warning:"));
    assert!(!out.contains("adjusted"));
    // header, axis label, point, blank, table header, 51 rows, axis ticks
    assert_eq!(out.lines().count(), 57);
}

#[test]
fn prediction_text_reports_range_warnings() {
    let catalog = catalog();
    let egg = catalog.get("egg_ofc").unwrap();
    let values = entry_values(egg, vec![parse_assignment("age=20").unwrap()]).unwrap();
    let request = PredictionRequest {
        formula: "egg_ofc".to_string(),
        values,
        ..PredictionRequest::default()
    };
    let prediction = predict(&catalog, &request).unwrap();
    let out = render_prediction(egg, &prediction, &request.values, "en", AppMode::Normal);

    assert!(out.contains("warning: "));
    assert!(out.contains("age value 20"));
}

#[test]
fn god_mode_prints_intercept_breakdown() {
    let catalog = catalog();
    let wheat = catalog.get("wheat_calc").unwrap();
    let values = entry_values(wheat, Vec::new()).unwrap();
    let request = PredictionRequest {
        formula: "wheat_calc".to_string(),
        values,
        ..PredictionRequest::default()
    };
    let prediction = predict(&catalog, &request).unwrap();
    let out = render_prediction(wheat, &prediction, &request.values, "en", AppMode::God);

    assert!(out.contains("intercept -1.0000"));
    assert!(out.contains("Unused_term"));
    assert!(out.contains("skipped (Unmapped)"));
    assert!(out.contains("primary beta +2.0000"));
}

#[test]
fn formula_model_prints_single_probability() {
    let catalog = catalog();
    let peanut = catalog.get("peanut_score").unwrap();
    let values = entry_values(peanut, Vec::new()).unwrap();

    let out = render_formula_probability(peanut, &values, "en");
    assert_eq!(out, "Peanut score (peanut_score)\nProbability: 26.9%\n");
}

#[test]
fn load_catalog_reads_file_and_reports_path_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("formulas.json");
    std::fs::write(&good, FIXTURE).unwrap();
    assert_eq!(load_catalog(&good).unwrap().len(), 4);

    let bad = dir.path().join("broken.json");
    let mut file = std::fs::File::create(&bad).unwrap();
    file.write_all(b"{}").unwrap();
    let err = load_catalog(&bad).unwrap_err();
    assert!(err.to_string().contains("broken.json"));

    assert!(load_catalog(&dir.path().join("missing.json")).is_err());
}

#[test]
fn curve_options_are_rejected_for_formula_models() {
    let catalog = catalog();
    let peanut = catalog.get("peanut_score").unwrap();

    assert!(check_curve_options(peanut, None, None).is_ok());
    let err = check_curve_options(peanut, Some("score"), Some(20)).unwrap_err();
    assert!(err.to_string().contains("--primary and --points"));
    assert!(check_curve_options(peanut, None, Some(20)).is_err());
}

#[test]
fn curve_options_are_accepted_for_curve_models() {
    let catalog = catalog();
    let milk = catalog.get("milk_ed").unwrap();
    assert!(check_curve_options(milk, Some("dose"), Some(20)).is_ok());
}
