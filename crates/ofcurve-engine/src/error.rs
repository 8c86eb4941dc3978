use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("formula not found: {name}")]
    FormulaNotFound { name: String },

    #[error("configuration error in formula '{formula}': {detail}")]
    Configuration { formula: String, detail: String },
}

impl EngineError {
    pub(crate) fn configuration(formula: &str, detail: impl Into<String>) -> Self {
        EngineError::Configuration {
            formula: formula.to_string(),
            detail: detail.into(),
        }
    }
}
