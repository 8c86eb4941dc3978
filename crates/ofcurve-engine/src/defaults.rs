use ofcurve_core::models::{Formula, InputDefinition};

use crate::factor::{FactorValue, FactorValues};

pub const DEFAULT_AGE: &str = "5";
pub const DEFAULT_TOTAL_IGE: &str = "100";
pub const DEFAULT_SPECIFIC_IGE: &str = "1.0";
pub const DEFAULT_PROTEIN_DOSE: &str = "100.0";

/// Initial entry state for a formula's inputs.
///
/// Sex defaults to `false` (male). Generic numeric inputs start at their
/// `min` when one is declared and are otherwise left empty.
pub fn default_factor_values(formula: &Formula) -> FactorValues {
    formula
        .inputs
        .iter()
        .map(|input| {
            let value: FactorValue = match input {
                InputDefinition::Age(_) => DEFAULT_AGE.into(),
                InputDefinition::TotalIge(_) => DEFAULT_TOTAL_IGE.into(),
                InputDefinition::SpecificIge(_) => DEFAULT_SPECIFIC_IGE.into(),
                InputDefinition::ProteinDose(_) => DEFAULT_PROTEIN_DOSE.into(),
                InputDefinition::Boolean(_) | InputDefinition::Sex(_) => FactorValue::Flag(false),
                InputDefinition::Numeric(i) => match i.min {
                    Some(min) => FactorValue::Text(min.to_string()),
                    None => FactorValue::Text(String::new()),
                },
            };
            (input.name().to_string(), value)
        })
        .collect()
}
