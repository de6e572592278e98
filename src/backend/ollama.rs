use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    backend::{BackendError, GenerationBackend},
    config::BackendConfig,
    models::GenerationResult,
};

#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: BackendConfig,
    health_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaClient {
    pub fn new(
        config: BackendConfig,
        health_timeout: Duration,
        generate_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| {
                BackendError::Unavailable(format!("failed to build Ollama HTTP client: {error}"))
            })?;

        Ok(Self {
            client,
            config,
            health_timeout,
            generate_timeout,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn check_health(&self) -> bool {
        let result = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!(
                    backend = self.name(),
                    status = response.status().as_u16(),
                    "health check returned non-200 status"
                );
                false
            }
            Err(error) => {
                warn!(backend = self.name(), error = %error, "health check failed");
                false
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult, BackendError> {
        let payload = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .timeout(self.generate_timeout)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown backend error".to_owned());
            return Err(map_http_error(status, body));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|error| {
            if error.is_timeout() {
                BackendError::Timeout(error.to_string())
            } else {
                BackendError::InvalidResponse(error.to_string())
            }
        })?;

        debug!(
            backend = self.name(),
            model = %parsed.model,
            done = parsed.done,
            response_chars = parsed.response.chars().count(),
            "generation completed"
        );

        Ok(GenerationResult {
            raw_text: parsed.response,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout(error.to_string())
    } else {
        BackendError::Unavailable(error.to_string())
    }
}

fn map_http_error(status: StatusCode, body: String) -> BackendError {
    let trimmed = body.chars().take(400).collect::<String>();
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BackendError::Timeout(format!("upstream timeout: {trimmed}"))
        }
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
            BackendError::Unavailable(format!("status {}: {trimmed}", status.as_u16()))
        }
        _ => BackendError::InvalidResponse(format!("status {}: {trimmed}", status.as_u16())),
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: String,
    response: String,
    #[serde(default)]
    done: bool,
}
