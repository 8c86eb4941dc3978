mod common;

use ofcurve_engine::factor::FactorValue;
use ofcurve_engine::range::{is_out_of_range, range_warnings};

use common::{formula, values};

#[test]
fn unparsable_and_empty_values_are_not_out_of_range() {
    let egg = formula("egg_ofc");
    let age = egg.input("age").unwrap();
    for raw in ["", "abc", "  "] {
        assert!(!is_out_of_range(age, &raw.into()), "{raw:?}");
    }
}

#[test]
fn bounds_are_inclusive() {
    let egg = formula("egg_ofc");
    let age = egg.input("age").unwrap();
    assert!(!is_out_of_range(age, &"0".into()));
    assert!(!is_out_of_range(age, &"18".into()));
    assert!(is_out_of_range(age, &"18.5".into()));
    assert!(is_out_of_range(age, &FactorValue::Number(-1.0)));
}

#[test]
fn absent_bound_is_unbounded() {
    let egg = formula("egg_ofc");
    let ige = egg.input("IgE").unwrap();
    assert!(is_out_of_range(ige, &"0.5".into()));
    assert!(!is_out_of_range(ige, &"100000".into()));

    let milk = formula("milk_ed");
    let sige = milk.input("sIgE_milk").unwrap();
    assert!(!is_out_of_range(sige, &"1e9".into()));
}

#[test]
fn non_numeric_kinds_are_never_out_of_range() {
    let egg = formula("egg_ofc");
    assert!(!is_out_of_range(egg.input("sex").unwrap(), &true.into()));
    assert!(!is_out_of_range(egg.input("atopic_dermatitis").unwrap(), &"99".into()));
}

#[test]
fn warnings_name_formula_and_input() {
    let egg = formula("egg_ofc");
    let vals = values(&[
        ("age", "25".into()),
        ("sIgE_egg", "500".into()),
        ("IgE", "100".into()),
    ]);
    let warnings = range_warnings(&egg, &vals);
    let inputs: Vec<_> = warnings.iter().map(|w| w.input.as_str()).collect();
    assert_eq!(inputs, ["sIgE_egg", "age"]);
    assert_eq!(warnings[1].value, 25.0);
    assert_eq!(
        warnings[1].message,
        "egg_ofc: age value 25 is outside the validated range [0, 18]"
    );
}
