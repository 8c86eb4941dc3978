use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::text::LocalizedText;
use super::{FEMALE_VARIABLE, MALE_VARIABLE, log_variable_name};

/// One entry field of a formula.
///
/// The `type` discriminant values are part of the catalog wire format and
/// must stay exactly as they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export)]
pub enum InputDefinition {
    #[serde(rename = "sex")]
    Sex(SexInput),
    #[serde(rename = "age")]
    Age(NumericInput),
    #[serde(rename = "boolean")]
    Boolean(BooleanInput),
    #[serde(rename = "IgE")]
    TotalIge(NumericInput),
    #[serde(rename = "sIgE")]
    SpecificIge(SpecificIgeInput),
    #[serde(rename = "proteindose")]
    ProteinDose(ProteinDoseInput),
    #[serde(rename = "numeric")]
    Numeric(NumericInput),
}

/// Discriminant of [`InputDefinition`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InputKind {
    Sex,
    Age,
    Boolean,
    TotalIge,
    SpecificIge,
    ProteinDose,
    Numeric,
}

impl InputKind {
    /// Kinds whose scope gets an additional `Log<name>` variable.
    pub fn is_log_transformed(self) -> bool {
        matches!(
            self,
            InputKind::TotalIge | InputKind::SpecificIge | InputKind::ProteinDose
        )
    }

    /// Kinds that can drive the x-axis of a probability curve.
    pub fn is_primary_candidate(self) -> bool {
        matches!(self, InputKind::SpecificIge | InputKind::ProteinDose)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SexInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<LocalizedText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BooleanInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<LocalizedText>,
}

/// Shared shape of age, total IgE and generic numeric inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NumericInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InputMode {
    /// The model's principal driving factor.
    Primary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpecificIgeInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<InputMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProteinDoseInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LocalizedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presets: Vec<DosePreset>,
}

/// A `(label, milligrams)` pair offered as a quick pick for a protein dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DosePreset(pub LocalizedText, pub f64);

impl DosePreset {
    pub fn label(&self) -> &LocalizedText {
        &self.0
    }

    pub fn milligrams(&self) -> f64 {
        self.1
    }
}

/// Advisory numeric bounds of an input. An absent bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl Bounds {
    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        let above_min = self.min.is_none_or(|min| value >= min);
        let below_max = self.max.is_none_or(|max| value <= max);
        above_min && below_max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl InputDefinition {
    pub fn name(&self) -> &str {
        match self {
            InputDefinition::Sex(i) => &i.name,
            InputDefinition::Boolean(i) => &i.name,
            InputDefinition::Age(i) | InputDefinition::TotalIge(i) | InputDefinition::Numeric(i) => {
                &i.name
            }
            InputDefinition::SpecificIge(i) => &i.name,
            InputDefinition::ProteinDose(i) => &i.name,
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            InputDefinition::Sex(_) => InputKind::Sex,
            InputDefinition::Age(_) => InputKind::Age,
            InputDefinition::Boolean(_) => InputKind::Boolean,
            InputDefinition::TotalIge(_) => InputKind::TotalIge,
            InputDefinition::SpecificIge(_) => InputKind::SpecificIge,
            InputDefinition::ProteinDose(_) => InputKind::ProteinDose,
            InputDefinition::Numeric(_) => InputKind::Numeric,
        }
    }

    pub fn caption(&self) -> Option<&LocalizedText> {
        match self {
            InputDefinition::Sex(i) => i.caption.as_ref(),
            InputDefinition::Boolean(i) => i.caption.as_ref(),
            InputDefinition::Age(i) | InputDefinition::TotalIge(i) | InputDefinition::Numeric(i) => {
                i.caption.as_ref()
            }
            InputDefinition::SpecificIge(i) => i.caption.as_ref(),
            InputDefinition::ProteinDose(i) => i.caption.as_ref(),
        }
    }

    pub fn unit(&self) -> Option<&LocalizedText> {
        match self {
            InputDefinition::Sex(_) | InputDefinition::Boolean(_) => None,
            InputDefinition::Age(i) | InputDefinition::TotalIge(i) | InputDefinition::Numeric(i) => {
                i.unit.as_ref()
            }
            InputDefinition::SpecificIge(i) => i.unit.as_ref(),
            InputDefinition::ProteinDose(i) => i.unit.as_ref(),
        }
    }

    /// Bounds of numeric kinds; `None` for sex and boolean inputs.
    pub fn bounds(&self) -> Option<Bounds> {
        let (min, max, step) = match self {
            InputDefinition::Sex(_) | InputDefinition::Boolean(_) => return None,
            InputDefinition::Age(i) | InputDefinition::TotalIge(i) | InputDefinition::Numeric(i) => {
                (i.min, i.max, i.step)
            }
            InputDefinition::SpecificIge(i) => (i.min, i.max, i.step),
            InputDefinition::ProteinDose(i) => (i.min, i.max, i.step),
        };
        Some(Bounds { min, max, step })
    }

    /// True for a specific-IgE input carrying `mode: "primary"`.
    pub fn is_marked_primary(&self) -> bool {
        matches!(
            self,
            InputDefinition::SpecificIge(SpecificIgeInput {
                mode: Some(InputMode::Primary),
                ..
            })
        )
    }

    /// Scope variables the input adds besides its own name: `Log<name>` for
    /// log-transformed kinds, the `male`/`female` pair for sex.
    pub fn derived_variable_names(&self) -> Vec<String> {
        match self {
            InputDefinition::Sex(_) => vec![MALE_VARIABLE.to_string(), FEMALE_VARIABLE.to_string()],
            _ if self.kind().is_log_transformed() => vec![log_variable_name(self.name())],
            _ => Vec::new(),
        }
    }

    pub fn presets(&self) -> &[DosePreset] {
        match self {
            InputDefinition::ProteinDose(i) => &i.presets,
            _ => &[],
        }
    }
}
