mod common;

use approx::assert_relative_eq;
use ofcurve_core::expression::SafeEvaluator;
use ofcurve_engine::factor::FactorValue;
use ofcurve_engine::scope::{build_scope, input_scope};

use common::{formula, values};

#[test]
fn sex_true_is_female() {
    let egg = formula("egg_ofc");
    let scope = input_scope(&egg, &values(&[("sex", true.into())]));
    assert_eq!(scope.get("male"), Some(0.0));
    assert_eq!(scope.get("female"), Some(1.0));
}

#[test]
fn sex_false_or_missing_is_male() {
    let egg = formula("egg_ofc");
    for vals in [values(&[("sex", false.into())]), values(&[])] {
        let scope = input_scope(&egg, &vals);
        assert_eq!(scope.get("male"), Some(1.0));
        assert_eq!(scope.get("female"), Some(0.0));
    }
}

#[test]
fn ige_family_gets_log10_variables() {
    let egg = formula("egg_ofc");
    let scope = input_scope(
        &egg,
        &values(&[("sIgE_egg", "10".into()), ("IgE", FactorValue::Number(1000.0))]),
    );
    assert_eq!(scope.get("sIgE_egg"), Some(10.0));
    assert_relative_eq!(scope.get("LogsIgE_egg").unwrap(), 1.0);
    assert_relative_eq!(scope.get("LogIgE").unwrap(), 3.0);
    assert!(!scope.contains("Logage"));
}

#[test]
fn protein_dose_gets_log10_variable() {
    let milk = formula("milk_ed");
    let scope = input_scope(&milk, &values(&[("dose", "1000".into())]));
    assert_relative_eq!(scope.get("Logdose").unwrap(), 3.0);
}

#[test]
fn zero_or_negative_dose_gives_non_finite_log() {
    let milk = formula("milk_ed");
    for raw in ["0", "-5"] {
        let scope = input_scope(&milk, &values(&[("dose", raw.into())]));
        assert!(!scope.get("Logdose").unwrap().is_finite(), "{raw}");
    }
}

#[test]
fn unparsable_values_become_nan() {
    let egg = formula("egg_ofc");
    let scope = input_scope(&egg, &values(&[("age", "five".into())]));
    assert!(scope.get("age").unwrap().is_nan());
    assert!(scope.get("sIgE_egg").unwrap().is_nan());
}

#[test]
fn boolean_flags_are_one_or_zero() {
    let egg = formula("egg_ofc");
    let on = input_scope(&egg, &values(&[("atopic_dermatitis", true.into())]));
    let off = input_scope(&egg, &values(&[("atopic_dermatitis", false.into())]));
    assert_eq!(on.get("atopic_dermatitis"), Some(1.0));
    assert_eq!(off.get("atopic_dermatitis"), Some(0.0));
}

#[test]
fn calc_items_run_in_declared_order() {
    let wheat = formula("wheat_calc");
    let scope = build_scope(
        &wheat,
        &values(&[("sIgE_wheat", "10".into()), ("age", "2".into())]),
        &SafeEvaluator,
    );
    assert_eq!(scope.get("age_months"), Some(24.0));
    assert_relative_eq!(scope.get("interaction").unwrap(), 2.0);
}

#[test]
fn failing_calc_items_become_zero() {
    let wheat = formula("wheat_calc");
    // sIgE_wheat missing: the interaction term evaluates to NaN.
    let scope = build_scope(&wheat, &values(&[("age", "2".into())]), &SafeEvaluator);
    assert_eq!(scope.get("interaction"), Some(0.0));
}

#[test]
fn factor_values_are_not_mutated() {
    let egg = formula("egg_ofc");
    let vals = values(&[("sIgE_egg", "10".into()), ("sex", true.into())]);
    let before = vals.clone();
    let _ = build_scope(&egg, &vals, &SafeEvaluator);
    assert_eq!(vals, before);
}
