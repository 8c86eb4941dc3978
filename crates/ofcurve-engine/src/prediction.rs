//! End-to-end prediction for one formula and one set of entries.

use ofcurve_core::catalog::Catalog;
use ofcurve_core::expression::SafeEvaluator;
use ofcurve_core::models::{Formula, InputKind};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::curve::{self, CurvePoint, DEFAULT_POINT_COUNT, Domain};
use crate::error::EngineError;
use crate::factor::FactorValues;
use crate::intercept::adjust_intercept_with;
use crate::primary::resolve_primary;
use crate::range::{RangeWarning, range_warnings};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionRequest {
    pub formula: String,
    #[serde(default)]
    pub values: FactorValues,
    /// Input to sweep; the formula's default primary when absent.
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub point_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Prediction {
    pub formula: String,
    pub primary_input: String,
    pub primary_kind: InputKind,
    pub beta_key: String,
    pub primary_beta: f64,
    pub adjusted_intercept: f64,
    pub domain: Domain,
    pub graph_visible: bool,
    pub curve: Vec<CurvePoint>,
    /// The current primary entry; `None` when it cannot be plotted.
    pub point: Option<CurvePoint>,
    pub range_warnings: Vec<RangeWarning>,
}

/// Look up the formula by name and predict.
pub fn predict(catalog: &Catalog, request: &PredictionRequest) -> Result<Prediction, EngineError> {
    let formula = catalog
        .get(&request.formula)
        .ok_or_else(|| EngineError::FormulaNotFound {
            name: request.formula.clone(),
        })?;
    predict_formula(formula, request)
}

pub fn predict_formula(formula: &Formula, request: &PredictionRequest) -> Result<Prediction, EngineError> {
    let primary = resolve_primary(formula, request.primary.as_deref())?;
    let primary_name = primary.input.name();

    let adjustment = adjust_intercept_with(&SafeEvaluator, formula, &request.values, Some(primary_name));
    let adjusted = adjustment.adjusted;

    let point_count = request.point_count.unwrap_or(DEFAULT_POINT_COUNT);
    let curve = curve::generate_curve(adjusted, primary.beta, primary.domain, point_count);
    let point = request
        .values
        .get(primary_name)
        .and_then(|raw| curve::evaluate_point(adjusted, primary.beta, raw));

    debug!(
        formula = %formula.name,
        primary = primary_name,
        adjusted_intercept = adjusted,
        skipped = adjustment.skipped.len(),
        "prediction computed"
    );

    Ok(Prediction {
        formula: formula.name.clone(),
        primary_input: primary_name.to_string(),
        primary_kind: primary.input.kind(),
        beta_key: primary.beta_key,
        primary_beta: primary.beta,
        adjusted_intercept: adjusted,
        domain: primary.domain,
        graph_visible: formula.graph_visible(),
        curve,
        point,
        range_warnings: range_warnings(formula, &request.values),
    })
}

/// Probability from the full linear predictor, with no primary factor.
///
/// Used for `formula`-mode models that have no curve to sweep.
pub fn formula_probability(formula: &Formula, values: &FactorValues) -> f64 {
    let adjustment = adjust_intercept_with(&SafeEvaluator, formula, values, None);
    curve::logistic(adjustment.adjusted, 0.0, 0.0)
}
