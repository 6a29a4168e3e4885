use thiserror::Error;

use crate::api_client::ApiError;
use crate::scoring::ScoringError;

/// Application-level error type for anything that both talks to the backend
/// and scores what it gets back.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),
}

impl AppError {
    /// True when the session was rejected and the caller should log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Api(ApiError::Unauthorized { .. }))
    }
}
