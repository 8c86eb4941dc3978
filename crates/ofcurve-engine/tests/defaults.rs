mod common;

use ofcurve_engine::defaults::default_factor_values;
use ofcurve_engine::factor::FactorValue;

use common::formula;

#[test]
fn defaults_per_input_kind() {
    let egg = formula("egg_ofc");
    let vals = default_factor_values(&egg);
    assert_eq!(vals["sIgE_egg"], FactorValue::Text("1.0".to_string()));
    assert_eq!(vals["age"], FactorValue::Text("5".to_string()));
    assert_eq!(vals["IgE"], FactorValue::Text("100".to_string()));
    assert_eq!(vals["sex"], FactorValue::Flag(false));
    assert_eq!(vals["atopic_dermatitis"], FactorValue::Flag(false));
    assert_eq!(vals.len(), egg.inputs.len());
}

#[test]
fn dose_and_numeric_defaults() {
    let milk = formula("milk_ed");
    assert_eq!(
        default_factor_values(&milk)["dose"],
        FactorValue::Text("100.0".to_string())
    );

    let peanut = formula("peanut_score");
    assert_eq!(
        default_factor_values(&peanut)["score"],
        FactorValue::Text("0".to_string())
    );
}

#[test]
fn numeric_values_parse_leniently_on_whitespace() {
    assert_eq!(FactorValue::from(" 2.5 ").parse_number(), Some(2.5));
    assert_eq!(FactorValue::from("inf").parse_number(), None);
    assert_eq!(FactorValue::Flag(true).numeric_value(), Some(1.0));
    assert_eq!(FactorValue::Flag(true).parse_number(), None);
}
