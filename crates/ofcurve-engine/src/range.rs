//! Advisory range checks for numeric inputs.
//!
//! Out-of-range values are still used in the calculation; callers decide
//! how to surface the warning.

use ofcurve_core::models::{Bounds, Formula, InputDefinition};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::factor::{FactorValue, FactorValues};

/// True iff `raw` parses as a number outside the input's `min`/`max`.
///
/// Unparsable or empty entries are never out of range, and the bounds
/// themselves are in range.
pub fn is_out_of_range(input: &InputDefinition, raw: &FactorValue) -> bool {
    let Some(bounds) = input.bounds() else {
        return false;
    };
    match raw.parse_number() {
        Some(value) => !bounds.contains(value),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeWarning {
    pub input: String,
    pub value: f64,
    pub bounds: Bounds,
    pub message: String,
}

fn describe(bounds: &Bounds) -> String {
    match (bounds.min, bounds.max) {
        (Some(min), Some(max)) => format!("[{min}, {max}]"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "any value".to_string(),
    }
}

/// Range warnings for every supplied value of `formula`, in input order.
pub fn range_warnings(formula: &Formula, values: &FactorValues) -> Vec<RangeWarning> {
    formula
        .inputs
        .iter()
        .filter_map(|input| {
            let raw = values.get(input.name())?;
            if !is_out_of_range(input, raw) {
                return None;
            }
            let bounds = input.bounds()?;
            let value = raw.parse_number()?;
            Some(RangeWarning {
                input: input.name().to_string(),
                value,
                bounds,
                message: format!(
                    "{}: {} value {} is outside the validated range {}",
                    formula.name,
                    input.name(),
                    value,
                    describe(&bounds),
                ),
            })
        })
        .collect()
}
