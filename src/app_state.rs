use std::sync::Arc;

use crate::config::ReportSettings;
use crate::services::report::ReportModel;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ReportModel>,
    pub settings: Arc<ReportSettings>,
}

impl AppState {
    pub fn new(model: impl ReportModel + 'static, settings: ReportSettings) -> Self {
        Self::from_shared(Arc::new(model), settings)
    }

    /// Build from a model that the caller also keeps a handle to.
    pub fn from_shared(model: Arc<dyn ReportModel>, settings: ReportSettings) -> Self {
        Self {
            model,
            settings: Arc::new(settings),
        }
    }
}
