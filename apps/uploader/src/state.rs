use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis_client::AnalysisService;
use crate::config::Config;
use crate::form::UploadForm;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single UI state record. Held only for transitions, never across
    /// the outbound request.
    pub form: Arc<Mutex<UploadForm>>,
    /// Pluggable analysis backend. Default: `HttpAnalysisClient`.
    pub analyzer: Arc<dyn AnalysisService>,
    pub config: Config,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn AnalysisService>, config: Config) -> Self {
        Self {
            form: Arc::new(Mutex::new(UploadForm::new())),
            analyzer,
            config,
        }
    }
}
