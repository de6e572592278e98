use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    backend::{BackendError, GenerationBackend},
    models::GenerationResult,
};

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Echo,
    Fail,
}

/// In-process stand-in for the generation backend. Records every prompt it
/// receives so callers can assert how many generations were issued.
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
    reply: MockReply,
    healthy: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            name: "mock-backend".to_owned(),
            reply: MockReply::Echo,
            healthy: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockBackend {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Text(text.into()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: MockReply::Fail,
            ..Self::default()
        }
    }

    pub fn with_health(self, healthy: bool) -> Self {
        self.healthy.store(healthy, Ordering::SeqCst);
        self
    }

    pub fn generate_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_health(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    async fn generate(&self, prompt: &str) -> Result<GenerationResult, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_owned());
        debug!(backend = %self.name, "mock generation");

        let raw_text = match &self.reply {
            MockReply::Text(text) => text.clone(),
            MockReply::Echo => format!("Mock response for prompt: {prompt}"),
            MockReply::Fail => {
                return Err(BackendError::Unavailable(
                    "mock backend configured to fail".to_owned(),
                ))
            }
        };

        Ok(GenerationResult { raw_text })
    }
}
