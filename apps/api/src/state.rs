use std::sync::Arc;

use crate::config::Config;
use crate::ingest::pipeline::Pipeline;
use crate::llm_client::TextGenerator;
use crate::store::CareerStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CareerStore>,
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}

impl AppState {
    /// Ingestion pipeline bound to this state's generator and store.
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(self.llm.as_ref(), self.store.as_ref(), self.config.llm_timeout)
    }
}
