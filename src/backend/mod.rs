pub mod mock;
pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::GenerationResult;

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Never fails: any transport or status problem reads as "offline".
    async fn check_health(&self) -> bool;

    /// Exactly one attempt per call.
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, BackendError>;
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("backend timeout: {0}")]
    Timeout(String),
    #[error("backend invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}
