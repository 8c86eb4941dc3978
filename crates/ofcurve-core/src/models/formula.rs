use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::input::InputDefinition;
use super::text::LocalizedText;

/// A pre-fit logistic regression model and the inputs it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Formula {
    /// Unique across the catalog; used as the lookup key.
    pub name: String,
    pub title: LocalizedText,
    pub shorttitle: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<LocalizedText>,
    pub foodtype: FoodType,
    #[serde(default)]
    pub references: Vec<String>,
    pub inputs: Vec<InputDefinition>,
    /// Evaluated in declared order; an item may only reference inputs and
    /// earlier items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calc: Vec<CalcDefinition>,
    pub output: OutputSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FoodType {
    Egg,
    Milk,
    Wheat,
    Peanut,
    Soy,
    Walnut,
    Hazelnut,
    Almond,
    Cashew,
    Pistachio,
    Fish,
    Sesame,
    Shellfish,
    Legume,
    Other,
}

/// A derived scope variable computed from an arithmetic expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalcDefinition {
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OutputSpec {
    pub mode: OutputMode,
    pub result: ResultSpec,
}

/// Curve semantics of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OutputMode {
    /// Probability of failing an oral food challenge.
    Ofc,
    /// Probability of reacting at a given eliciting dose.
    Ed,
    /// A plain formula with no curve listing.
    Formula,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResultSpec {
    /// Free-form legacy field kept for data compatibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub intercept: f64,
    pub beta: BTreeMap<String, f64>,
    #[serde(default)]
    pub graph: GraphVisibility,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GraphVisibility {
    #[default]
    Show,
    Hide,
}

impl Formula {
    pub fn input(&self, name: &str) -> Option<&InputDefinition> {
        self.inputs.iter().find(|i| i.name() == name)
    }

    pub fn intercept(&self) -> f64 {
        self.output.result.intercept
    }

    pub fn beta(&self) -> &BTreeMap<String, f64> {
        &self.output.result.beta
    }

    pub fn graph_visible(&self) -> bool {
        self.output.result.graph == GraphVisibility::Show
    }

    /// Whether the formula belongs in the probability-curve listing.
    pub fn has_curve(&self) -> bool {
        matches!(self.output.mode, OutputMode::Ofc | OutputMode::Ed)
    }

    /// Every scope variable name the inputs derive, before calc items run.
    pub fn input_variable_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for input in &self.inputs {
            names.insert(input.name().to_string());
            names.extend(input.derived_variable_names());
        }
        names
    }

    /// Input-derived names plus every calc output name.
    pub fn scope_variable_names(&self) -> BTreeSet<String> {
        let mut names = self.input_variable_names();
        names.extend(self.calc.iter().map(|c| c.name.clone()));
        names
    }

    /// Beta keys that no input or calc item can ever produce.
    pub fn unmapped_beta_keys(&self) -> Vec<&str> {
        let known = self.scope_variable_names();
        self.beta()
            .keys()
            .filter(|k| !known.contains(k.as_str()))
            .map(String::as_str)
            .collect()
    }
}
