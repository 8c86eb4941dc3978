use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A raw value entered for one input, as the UI layer holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FactorValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// Raw values keyed by input name. Owned by the caller; never mutated here.
pub type FactorValues = BTreeMap<String, FactorValue>;

impl FactorValue {
    /// The value as the user typed it, parsed as a finite number.
    ///
    /// Flags are not numbers here; empty or partial text is `None`.
    pub fn parse_number(&self) -> Option<f64> {
        let parsed = match self {
            FactorValue::Number(n) => Some(*n),
            FactorValue::Text(s) => s.trim().parse::<f64>().ok(),
            FactorValue::Flag(_) => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    /// Numeric coercion for the variable scope: flags count as 1/0.
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            FactorValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.parse_number(),
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, FactorValue::Flag(true))
    }
}

impl From<bool> for FactorValue {
    fn from(b: bool) -> Self {
        FactorValue::Flag(b)
    }
}

impl From<f64> for FactorValue {
    fn from(n: f64) -> Self {
        FactorValue::Number(n)
    }
}

impl From<&str> for FactorValue {
    fn from(s: &str) -> Self {
        FactorValue::Text(s.to_string())
    }
}

impl From<String> for FactorValue {
    fn from(s: String) -> Self {
        FactorValue::Text(s)
    }
}
