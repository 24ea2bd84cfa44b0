use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelRuntime;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one loaded model; generations are serialized inside the runtime.
    pub model: Arc<ModelRuntime>,
    pub config: Config,
}
