//! Intercept adjustment.
//!
//! Partial evaluation of a multivariable logistic model: every covariate
//! except the primary factor is held at its entered value and folded into
//! the intercept, leaving a one-variable model along the x-axis.

use ofcurve_core::expression::{CalcEvaluator, SafeEvaluator};
use ofcurve_core::models::{Formula, log_variable_name};
use serde::Serialize;
use tracing::warn;

use crate::factor::FactorValues;
use crate::scope::build_scope;

/// One coefficient folded into the intercept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub key: String,
    pub beta: f64,
    pub value: f64,
}

impl Contribution {
    pub fn amount(&self) -> f64 {
        self.beta * self.value
    }
}

/// Why a coefficient was left out of the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No input or calc item produces the key.
    Unmapped,
    /// The variable exists but its value is NaN or infinite.
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterceptAdjustment {
    pub base: f64,
    pub adjusted: f64,
    pub contributions: Vec<Contribution>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Adjusted intercept with the default calc evaluator.
pub fn adjust_intercept(formula: &Formula, values: &FactorValues, primary_input: &str) -> f64 {
    adjust_intercept_with(&SafeEvaluator, formula, values, Some(primary_input)).adjusted
}

/// Fold every non-primary coefficient into the intercept.
///
/// Coefficients keyed by the primary input's name or its `Log<name>` form
/// are excluded; with no primary every coefficient is folded. A key with
/// no scope variable, or whose variable is not a finite number, is skipped
/// with a warning so partial entry still yields a finite result.
pub fn adjust_intercept_with(
    evaluator: &dyn CalcEvaluator,
    formula: &Formula,
    values: &FactorValues,
    primary_input: Option<&str>,
) -> InterceptAdjustment {
    let scope = build_scope(formula, values, evaluator);
    let excluded: Vec<String> = primary_input
        .map(|name| vec![name.to_string(), log_variable_name(name)])
        .unwrap_or_default();
    let base = formula.intercept();

    let mut adjusted = base;
    let mut contributions = Vec::new();
    let mut skipped = Vec::new();

    for (key, &beta) in formula.beta() {
        if excluded.contains(key) {
            continue;
        }
        let Some(value) = scope.get(key) else {
            warn!(formula = %formula.name, key = %key, "beta coefficient has no matching variable, skipping");
            skipped.push((key.clone(), SkipReason::Unmapped));
            continue;
        };
        let contribution = Contribution {
            key: key.clone(),
            beta,
            value,
        };
        if !contribution.amount().is_finite() {
            warn!(
                formula = %formula.name,
                key = %key,
                value,
                "variable for beta coefficient is not finite, skipping"
            );
            skipped.push((key.clone(), SkipReason::NonFinite));
            continue;
        }
        adjusted += contribution.amount();
        contributions.push(contribution);
    }

    InterceptAdjustment {
        base,
        adjusted,
        contributions,
        skipped,
    }
}
