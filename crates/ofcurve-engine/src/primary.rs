//! Primary factor selection.
//!
//! The primary factor is the input swept along the x-axis. Only specific
//! IgE and protein-dose inputs qualify; its coefficient must be keyed by
//! the `Log<name>` form since the curve is drawn in log10 space.

use ofcurve_core::models::{Formula, InputDefinition, log_variable_name};
use tracing::warn;

use crate::curve::Domain;
use crate::error::EngineError;

/// Inputs that can drive the x-axis, in declared order.
pub fn primary_candidates(formula: &Formula) -> Vec<&InputDefinition> {
    formula
        .inputs
        .iter()
        .filter(|i| i.kind().is_primary_candidate())
        .collect()
}

/// The sIgE input marked primary, else the first candidate.
pub fn default_primary<'a>(candidates: &[&'a InputDefinition]) -> Option<&'a InputDefinition> {
    candidates
        .iter()
        .find(|i| i.is_marked_primary())
        .or_else(|| candidates.first())
        .copied()
}

/// A primary factor with everything needed to draw its curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryFactor<'a> {
    pub input: &'a InputDefinition,
    pub beta_key: String,
    pub beta: f64,
    pub domain: Domain,
}

/// Pick the primary factor: `requested` by name, else the default.
///
/// Switching primary re-derives the domain and coefficient from scratch.
pub fn resolve_primary<'a>(
    formula: &'a Formula,
    requested: Option<&str>,
) -> Result<PrimaryFactor<'a>, EngineError> {
    let candidates = primary_candidates(formula);

    let input = match requested {
        Some(name) => {
            let input = formula.input(name).ok_or_else(|| {
                EngineError::configuration(&formula.name, format!("no input named '{name}'"))
            })?;
            if !input.kind().is_primary_candidate() {
                return Err(EngineError::configuration(
                    &formula.name,
                    format!("input '{name}' cannot be used as the primary factor"),
                ));
            }
            input
        }
        None => default_primary(&candidates).ok_or_else(|| {
            EngineError::configuration(
                &formula.name,
                "no sIgE or protein-dose input to use as the primary factor",
            )
        })?,
    };

    let beta_key = log_variable_name(input.name());
    let Some(&beta) = formula.beta().get(&beta_key) else {
        warn!(formula = %formula.name, key = %beta_key, "primary beta coefficient missing");
        return Err(EngineError::configuration(
            &formula.name,
            format!("beta coefficient '{beta_key}' for primary input '{}' is missing", input.name()),
        ));
    };
    if !beta.is_finite() {
        return Err(EngineError::configuration(
            &formula.name,
            format!("beta coefficient '{beta_key}' is not a finite number"),
        ));
    }

    Ok(PrimaryFactor {
        input,
        beta_key,
        beta,
        domain: Domain::for_input(input),
    })
}
