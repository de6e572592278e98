use std::{sync::Arc, time::Instant};

use tracing::{error, info};
use uuid::Uuid;

use crate::{
    backend::{BackendError, GenerationBackend},
    metrics::AppMetrics,
    models::{BackendStatus, RequestKind},
    prompts::build_prompt,
    sanitize::sanitize,
};

/// Shared pipeline behind both transports: prompt, one generation call,
/// sanitize.
pub struct MechanicService {
    backend: Arc<dyn GenerationBackend>,
    metrics: Arc<AppMetrics>,
}

impl MechanicService {
    pub fn new(backend: Arc<dyn GenerationBackend>, metrics: Arc<AppMetrics>) -> Self {
        Self { backend, metrics }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub async fn status(&self) -> BackendStatus {
        if self.backend.check_health().await {
            BackendStatus::Ok
        } else {
            BackendStatus::Offline
        }
    }

    pub async fn handle(&self, kind: &RequestKind) -> Result<String, BackendError> {
        let request_id = format!("req_{}", Uuid::new_v4());
        let prompt = build_prompt(kind);
        info!(
            request_id = %request_id,
            kind = kind.label(),
            backend = self.backend.name(),
            prompt_chars = prompt.chars().count(),
            "generation requested"
        );

        let started = Instant::now();
        let result = self.backend.generate(&prompt).await;
        let elapsed = started.elapsed();
        self.metrics.observe_generation(kind.label(), elapsed);

        let generated = result.map_err(|error| {
            self.metrics.observe_backend_error(error.stage());
            error!(
                request_id = %request_id,
                kind = kind.label(),
                error = %error,
                latency_ms = elapsed.as_millis() as u64,
                "generation failed"
            );
            error
        })?;

        let cleaned = sanitize(&generated.raw_text);
        info!(
            request_id = %request_id,
            kind = kind.label(),
            latency_ms = elapsed.as_millis() as u64,
            raw_chars = generated.raw_text.chars().count(),
            result_chars = cleaned.chars().count(),
            "generation completed"
        );

        Ok(cleaned)
    }
}
