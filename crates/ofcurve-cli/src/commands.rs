//! Command implementations. Each returns the text to print so the output
//! can be tested without a terminal.

use std::fmt::Write as _;
use std::path::Path;

use ofcurve_core::catalog::Catalog;
use ofcurve_core::i18n::display_string;
use ofcurve_core::links::reference_url;
use ofcurve_core::models::{Formula, InputDefinition, InputKind, LocalizedText};
use ofcurve_engine::curve::{axis_ticks, format_axis_value};
use ofcurve_engine::defaults::default_factor_values;
use ofcurve_engine::factor::{FactorValue, FactorValues};
use ofcurve_engine::intercept::adjust_intercept_with;
use ofcurve_engine::prediction::{Prediction, formula_probability};
use ofcurve_engine::primary::{default_primary, primary_candidates};

use crate::config::AppMode;

pub fn load_catalog(path: &Path) -> eyre::Result<Catalog> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read catalog at {}: {e}", path.display()))?;
    Catalog::from_json_str(&json).map_err(|e| eyre::eyre!("{}: {e}", path.display()))
}

/// Parse a `NAME=VALUE` assignment. `true`/`false` become flags; anything
/// else is kept as entered text.
pub fn parse_assignment(s: &str) -> Result<(String, FactorValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing input name in '{s}'"));
    }
    let value = match value.trim() {
        "true" => FactorValue::Flag(true),
        "false" => FactorValue::Flag(false),
        other => FactorValue::Text(other.to_string()),
    };
    Ok((name.to_string(), value))
}

fn text(t: &LocalizedText, lang: &str) -> String {
    display_string(Some(t), Some(lang))
}

fn builtin(key: &str, lang: &str) -> String {
    text(&LocalizedText::from(format!("@{key}").as_str()), lang)
}

fn label(input: &InputDefinition, lang: &str) -> String {
    match input.caption() {
        Some(caption) => text(caption, lang),
        None => input.name().to_string(),
    }
}

fn kind_name(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Sex => "sex",
        InputKind::Age => "age",
        InputKind::Boolean => "boolean",
        InputKind::TotalIge => "total IgE",
        InputKind::SpecificIge => "sIgE",
        InputKind::ProteinDose => "protein dose",
        InputKind::Numeric => "numeric",
    }
}

pub fn list(catalog: &Catalog, lang: &str, all: bool, mode: AppMode) -> String {
    let show_all = all || mode != AppMode::Normal;
    let mut out = String::new();
    let _ = writeln!(out, "{}:", builtin("AvailableCurves", lang));
    let formulas: Vec<&Formula> = if show_all {
        catalog.formulas().iter().collect()
    } else {
        catalog.curve_formulas().collect()
    };
    for formula in formulas {
        let _ = writeln!(out, "  {:<20} {}", formula.name, text(&formula.title, lang));
    }
    out
}

pub fn show(formula: &Formula, lang: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", text(&formula.title, lang), formula.name);
    if let Some(info) = &formula.info {
        let _ = writeln!(out, "{}", text(info, lang));
    }

    let _ = writeln!(out, "\nInputs:");
    for input in &formula.inputs {
        let mut line = format!("  {:<16} {:<13} {}", input.name(), kind_name(input.kind()), label(input, lang));
        if let Some(unit) = input.unit() {
            let _ = write!(line, " [{}]", text(unit, lang));
        }
        if let Some(bounds) = input.bounds()
            && !bounds.is_unbounded()
        {
            let min = bounds.min.map(|v| v.to_string()).unwrap_or_default();
            let max = bounds.max.map(|v| v.to_string()).unwrap_or_default();
            let _ = write!(line, " range {min}..{max}");
        }
        if input.is_marked_primary() {
            line.push_str(" (primary)");
        }
        let _ = writeln!(out, "{line}");
        for preset in input.presets() {
            let _ = writeln!(out, "      {} = {} mg", text(preset.label(), lang), preset.milligrams());
        }
    }

    if !formula.calc.is_empty() {
        let _ = writeln!(out, "\nDerived:");
        for item in &formula.calc {
            let _ = writeln!(out, "  {} = {}", item.name, item.expression);
        }
    }

    let candidates = primary_candidates(formula);
    if !candidates.is_empty() {
        let default = default_primary(&candidates).map(|i| i.name()).unwrap_or_default();
        let names: Vec<_> = candidates.iter().map(|i| i.name()).collect();
        let _ = writeln!(out, "\nPrimary factors: {} (default {default})", names.join(", "));
    }

    if !formula.references.is_empty() {
        let _ = writeln!(out, "\n{}:", builtin("References", lang));
        for reference in &formula.references {
            let url = reference_url(reference);
            if url == *reference {
                let _ = writeln!(out, "  {reference}");
            } else {
                let _ = writeln!(out, "  {reference} <{url}>");
            }
        }
    }
    out
}

/// Defaults for every input, overridden by the given assignments.
pub fn entry_values(formula: &Formula, assignments: Vec<(String, FactorValue)>) -> eyre::Result<FactorValues> {
    let mut values = default_factor_values(formula);
    for (name, value) in assignments {
        if formula.input(&name).is_none() {
            return Err(eyre::eyre!("formula '{}' has no input named '{name}'", formula.name));
        }
        values.insert(name, value);
    }
    Ok(values)
}

/// Curve-only options make no sense for a model without a curve.
pub fn check_curve_options(formula: &Formula, primary: Option<&str>, points: Option<usize>) -> eyre::Result<()> {
    if formula.has_curve() {
        return Ok(());
    }
    let mut given = Vec::new();
    if primary.is_some() {
        given.push("--primary");
    }
    if points.is_some() {
        given.push("--points");
    }
    if given.is_empty() {
        Ok(())
    } else {
        Err(eyre::eyre!(
            "formula '{}' has no probability curve; {} cannot be used with it",
            formula.name,
            given.join(" and ")
        ))
    }
}

pub fn render_prediction(
    formula: &Formula,
    prediction: &Prediction,
    values: &FactorValues,
    lang: &str,
    mode: AppMode,
) -> String {
    let mut out = String::new();
    let primary = formula.input(&prediction.primary_input);
    let primary_label = primary
        .map(|i| label(i, lang))
        .unwrap_or_else(|| prediction.primary_input.clone());
    let _ = writeln!(out, "{} ({})", text(&formula.shorttitle, lang), formula.name);
    let _ = writeln!(out, "x-axis: {primary_label} ({}, log10 scale)", prediction.beta_key);

    match prediction.point {
        Some(point) => {
            let _ = writeln!(
                out,
                "{}: {:.1}% at {} = {}",
                builtin("Probability", lang),
                point.probability * 100.0,
                primary_label,
                format_axis_value(point.x),
            );
        }
        None => {
            let _ = writeln!(out, "no prediction for the current {primary_label} entry");
        }
    }

    for warning in &prediction.range_warnings {
        let _ = writeln!(out, "warning: {}", warning.message);
    }

    if mode == AppMode::God {
        let adjustment = adjust_intercept_with(
            &ofcurve_core::expression::SafeEvaluator,
            formula,
            values,
            Some(prediction.primary_input.as_str()),
        );
        let _ = writeln!(out, "\nintercept {:+.4}", adjustment.base);
        for c in &adjustment.contributions {
            let _ = writeln!(out, "  {:<20} {:+.4} x {:.4} = {:+.4}", c.key, c.beta, c.value, c.amount());
        }
        for (key, reason) in &adjustment.skipped {
            let _ = writeln!(out, "  {key:<20} skipped ({reason:?})");
        }
        let _ = writeln!(out, "adjusted {:+.4}, primary beta {:+.4}", adjustment.adjusted, prediction.primary_beta);
    }

    if prediction.graph_visible {
        let _ = writeln!(out, "\n{:>10}  {:>6}", primary_label, "p(%)");
        for p in &prediction.curve {
            let _ = writeln!(out, "{:>10}  {:>6.1}", format_axis_value(p.x), p.probability * 100.0);
        }
        let ticks: Vec<_> = axis_ticks(prediction.domain, 5)
            .into_iter()
            .map(|t| t.label)
            .collect();
        let _ = writeln!(out, "axis: {}", ticks.join(" | "));
    }
    out
}

/// Single-probability output for models without a curve.
pub fn render_formula_probability(formula: &Formula, values: &FactorValues, lang: &str) -> String {
    let p = formula_probability(formula, values);
    format!(
        "{} ({})\n{}: {:.1}%\n",
        text(&formula.shorttitle, lang),
        formula.name,
        builtin("Probability", lang),
        p * 100.0
    )
}
