//! Formula catalog loading and validation.
//!
//! The catalog is parsed once at startup and is read-only afterwards. Any
//! malformed formula rejects the whole catalog: a misconfigured model must
//! never silently serve wrong coefficients.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use ts_rs::TS;

use crate::error::CoreError;
use crate::expression;
use crate::models::{Formula, InputDefinition, LocalizedText};

/// The rule a catalog entry broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Constraint {
    /// Wrong JSON shape, missing field, or unknown enumeration value.
    Shape,
    UniqueFormulaName,
    NonEmptyName,
    /// Input and calc names must be unique within a formula.
    UniqueVariableName,
    /// Per-language maps must include an `en` entry.
    EnglishText,
    BoundsOrder,
    PositiveStep,
    SinglePrimary,
    /// Calc items may only reference earlier items.
    CalcOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// Location of the offending value, e.g. `formulas[2].inputs[1]`.
    pub path: String,
    pub constraint: Constraint,
    pub message: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, constraint: Constraint, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint,
            message: message.into(),
        }
    }
}

/// The validated, ordered set of formulas.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    formulas: Vec<Formula>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let serde_json::Value::Array(items) = value else {
            return Err(ValidationError::new(
                "formulas",
                Constraint::Shape,
                "expected an array of formulas",
            )
            .into());
        };

        let mut formulas = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            formulas.push(parse_formula(index, item)?);
        }
        Self::from_formulas(formulas)
    }

    pub fn from_formulas(formulas: Vec<Formula>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for (index, formula) in formulas.iter().enumerate() {
            let path = format!("formulas[{index}]");
            if !seen.insert(formula.name.as_str()) {
                return Err(ValidationError::new(
                    format!("{path}.name"),
                    Constraint::UniqueFormulaName,
                    format!("duplicate formula name '{}'", formula.name),
                )
                .into());
            }
            validate_formula(&path, formula)?;
        }

        for formula in &formulas {
            for key in formula.unmapped_beta_keys() {
                warn!(
                    formula = %formula.name,
                    key,
                    "beta coefficient does not match any input or calc variable"
                );
            }
        }

        info!(count = formulas.len(), "formula catalog loaded");
        Ok(Self { formulas })
    }

    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    pub fn get(&self, name: &str) -> Option<&Formula> {
        self.formulas.iter().find(|f| f.name == name)
    }

    /// Formulas with a probability curve (`ofc` and `ed` modes).
    pub fn curve_formulas(&self) -> impl Iterator<Item = &Formula> {
        self.formulas.iter().filter(|f| f.has_curve())
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

/// Deserialize one formula, narrowing the error path to the offending
/// input, calc item or output block where possible.
fn parse_formula(index: usize, item: serde_json::Value) -> Result<Formula, ValidationError> {
    let path = format!("formulas[{index}]");
    match serde_json::from_value::<Formula>(item.clone()) {
        Ok(formula) => Ok(formula),
        Err(e) => {
            let (path, detail) = locate_shape_error(&path, &item).unwrap_or((path, e.to_string()));
            let label = item
                .get("name")
                .and_then(|n| n.as_str())
                .map(|n| format!("formula '{n}': "))
                .unwrap_or_default();
            Err(ValidationError::new(
                path,
                Constraint::Shape,
                format!("{label}{detail}"),
            ))
        }
    }
}

fn locate_shape_error(path: &str, item: &serde_json::Value) -> Option<(String, String)> {
    if let Some(inputs) = item.get("inputs").and_then(|v| v.as_array()) {
        for (i, input) in inputs.iter().enumerate() {
            if let Err(e) = serde_json::from_value::<InputDefinition>(input.clone()) {
                return Some((format!("{path}.inputs[{i}]"), e.to_string()));
            }
        }
    }
    if let Some(calc) = item.get("calc").and_then(|v| v.as_array()) {
        for (i, entry) in calc.iter().enumerate() {
            if let Err(e) = serde_json::from_value::<crate::models::CalcDefinition>(entry.clone()) {
                return Some((format!("{path}.calc[{i}]"), e.to_string()));
            }
        }
    }
    if let Some(output) = item.get("output")
        && let Err(e) = serde_json::from_value::<crate::models::OutputSpec>(output.clone())
    {
        return Some((format!("{path}.output"), e.to_string()));
    }
    None
}

fn check_text(path: String, text: &LocalizedText) -> Result<(), ValidationError> {
    if text.has_english() {
        Ok(())
    } else {
        Err(ValidationError::new(
            path,
            Constraint::EnglishText,
            "localized text must include an 'en' entry",
        ))
    }
}

fn validate_formula(path: &str, formula: &Formula) -> Result<(), ValidationError> {
    if formula.name.trim().is_empty() {
        return Err(ValidationError::new(
            format!("{path}.name"),
            Constraint::NonEmptyName,
            "formula name must not be empty",
        ));
    }

    check_text(format!("{path}.title"), &formula.title)?;
    check_text(format!("{path}.shorttitle"), &formula.shorttitle)?;
    if let Some(info) = &formula.info {
        check_text(format!("{path}.info"), info)?;
    }

    let mut names: HashSet<String> = HashSet::new();
    let mut primary_marked = false;
    for (i, input) in formula.inputs.iter().enumerate() {
        let input_path = format!("{path}.inputs[{i}]");
        validate_input(&input_path, &formula.name, input)?;
        if !names.insert(input.name().to_string()) {
            return Err(ValidationError::new(
                format!("{input_path}.name"),
                Constraint::UniqueVariableName,
                format!("formula '{}': duplicate input name '{}'", formula.name, input.name()),
            ));
        }
        if input.is_marked_primary() {
            if primary_marked {
                return Err(ValidationError::new(
                    format!("{input_path}.mode"),
                    Constraint::SinglePrimary,
                    format!(
                        "formula '{}': more than one sIgE input is marked primary",
                        formula.name
                    ),
                ));
            }
            primary_marked = true;
        }
    }

    // Derived variables live in the same scope as raw input names.
    for (i, input) in formula.inputs.iter().enumerate() {
        for derived in input.derived_variable_names() {
            if names.contains(&derived) {
                let clash = formula
                    .inputs
                    .iter()
                    .position(|other| other.name() == derived)
                    .unwrap_or(i);
                return Err(ValidationError::new(
                    format!("{path}.inputs[{clash}].name"),
                    Constraint::UniqueVariableName,
                    format!(
                        "formula '{}': variable '{derived}' derived from input '{}' is already defined",
                        formula.name,
                        input.name()
                    ),
                ));
            }
            names.insert(derived);
        }
    }

    let calc_names: Vec<&str> = formula.calc.iter().map(|c| c.name.as_str()).collect();
    for (i, item) in formula.calc.iter().enumerate() {
        let calc_path = format!("{path}.calc[{i}]");
        if item.name.trim().is_empty() {
            return Err(ValidationError::new(
                format!("{calc_path}.name"),
                Constraint::NonEmptyName,
                format!("formula '{}': calc name must not be empty", formula.name),
            ));
        }
        if !names.insert(item.name.clone()) {
            return Err(ValidationError::new(
                format!("{calc_path}.name"),
                Constraint::UniqueVariableName,
                format!(
                    "formula '{}': calc name '{}' is already a scope variable",
                    formula.name, item.name
                ),
            ));
        }
        // Unparsable expressions are tolerated here and fall back to 0 at
        // evaluation time; only ordering is structural.
        if let Some(refs) = expression::referenced_names(&item.expression)
            && let Some(bad) = refs.iter().find(|r| calc_names[i..].contains(&r.as_str()))
        {
            return Err(ValidationError::new(
                format!("{calc_path}.expression"),
                Constraint::CalcOrder,
                format!(
                    "formula '{}': calc '{}' references '{}', which is not computed before it",
                    formula.name, item.name, bad
                ),
            ));
        }
    }

    Ok(())
}

fn validate_input(path: &str, formula: &str, input: &InputDefinition) -> Result<(), ValidationError> {
    if input.name().trim().is_empty() {
        return Err(ValidationError::new(
            format!("{path}.name"),
            Constraint::NonEmptyName,
            format!("formula '{formula}': input name must not be empty"),
        ));
    }
    if let Some(caption) = input.caption() {
        check_text(format!("{path}.caption"), caption)?;
    }
    if let Some(unit) = input.unit() {
        check_text(format!("{path}.unit"), unit)?;
    }
    for (i, preset) in input.presets().iter().enumerate() {
        check_text(format!("{path}.presets[{i}]"), preset.label())?;
    }
    if let Some(bounds) = input.bounds() {
        if let (Some(min), Some(max)) = (bounds.min, bounds.max)
            && min > max
        {
            return Err(ValidationError::new(
                path,
                Constraint::BoundsOrder,
                format!(
                    "formula '{formula}': input '{}' has min {min} greater than max {max}",
                    input.name()
                ),
            ));
        }
        if let Some(step) = bounds.step
            && step <= 0.0
        {
            return Err(ValidationError::new(
                format!("{path}.step"),
                Constraint::PositiveStep,
                format!(
                    "formula '{formula}': input '{}' has non-positive step {step}",
                    input.name()
                ),
            ));
        }
    }
    Ok(())
}
