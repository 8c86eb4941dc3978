use thiserror::Error;

use crate::catalog::ValidationError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog validation failed: {0}")]
    Validation(#[from] ValidationError),
}
