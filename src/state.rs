use std::sync::Arc;

use crate::{backend::GenerationBackend, metrics::AppMetrics, service::MechanicService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MechanicService>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new<B>(backend: Arc<B>) -> Self
    where
        B: GenerationBackend + 'static,
    {
        let backend: Arc<dyn GenerationBackend> = backend;
        let metrics = Arc::new(AppMetrics::new());
        Self {
            service: Arc::new(MechanicService::new(backend, metrics.clone())),
            metrics,
        }
    }
}
