//! Per-calculation variable scope.
//!
//! Built fresh from the factor values on every change: the raw value under
//! the input's name, `Log<name>` for IgE, sIgE and protein-dose inputs, and
//! `male`/`female` one-hot variables for the sex input. Calc outputs are
//! merged into the same scope in declared order.

use std::collections::BTreeMap;

use ofcurve_core::expression::{CalcEvaluator, Scope};
use ofcurve_core::models::{FEMALE_VARIABLE, Formula, InputDefinition, MALE_VARIABLE, log_variable_name};
use serde::Serialize;
use tracing::{debug, warn};

use crate::factor::FactorValues;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariableScope(BTreeMap<String, f64>);

impl VariableScope {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Scope for VariableScope {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

/// Derive input variables only; calc items are not evaluated.
///
/// Missing or unparsable values become NaN, and so does the logarithm of a
/// non-positive value. Those are tolerated here and filtered out when the
/// intercept is folded.
pub fn input_scope(formula: &Formula, values: &FactorValues) -> VariableScope {
    let mut scope = VariableScope::default();

    for input in &formula.inputs {
        let name = input.name();
        let raw = values.get(name);
        if raw.is_none() {
            debug!(formula = %formula.name, input = name, "no value supplied");
        }

        match input {
            InputDefinition::Sex(_) => {
                let female = raw.is_some_and(|v| v.is_true());
                scope.insert(name, if female { 1.0 } else { 0.0 });
                scope.insert(MALE_VARIABLE, if female { 0.0 } else { 1.0 });
                scope.insert(FEMALE_VARIABLE, if female { 1.0 } else { 0.0 });
            }
            InputDefinition::TotalIge(_)
            | InputDefinition::SpecificIge(_)
            | InputDefinition::ProteinDose(_) => {
                let value = raw.and_then(|v| v.numeric_value()).unwrap_or(f64::NAN);
                scope.insert(name, value);
                scope.insert(log_variable_name(name), value.log10());
            }
            InputDefinition::Age(_) | InputDefinition::Boolean(_) | InputDefinition::Numeric(_) => {
                let value = raw.and_then(|v| v.numeric_value()).unwrap_or(f64::NAN);
                scope.insert(name, value);
            }
        }
    }

    scope
}

/// Derive input variables, then run every calc item in declared order.
pub fn build_scope(
    formula: &Formula,
    values: &FactorValues,
    evaluator: &dyn CalcEvaluator,
) -> VariableScope {
    let mut scope = input_scope(formula, values);

    for item in &formula.calc {
        let value = evaluator.evaluate(&item.expression, &scope);
        if value.is_finite() {
            scope.insert(item.name.as_str(), value);
        } else {
            warn!(
                formula = %formula.name,
                calc = %item.name,
                expression = %item.expression,
                value,
                "calc result is not finite, using 0"
            );
            scope.insert(item.name.as_str(), 0.0);
        }
    }

    scope
}
