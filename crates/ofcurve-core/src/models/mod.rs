pub mod formula;
pub mod input;
pub mod text;

pub use formula::{
    CalcDefinition, FoodType, Formula, GraphVisibility, OutputMode, OutputSpec, ResultSpec,
};
pub use input::{
    Bounds, BooleanInput, DosePreset, InputDefinition, InputKind, InputMode, NumericInput,
    ProteinDoseInput, SexInput, SpecificIgeInput,
};
pub use text::LocalizedText;

/// Scope variable holding the base-10 logarithm of a log-transformed input.
pub fn log_variable_name(input_name: &str) -> String {
    format!("Log{input_name}")
}

/// Scope variables derived from a sex input.
pub const MALE_VARIABLE: &str = "male";
pub const FEMALE_VARIABLE: &str = "female";
