use crate::config::Config;
use crate::service::FraudScorer;
use std::sync::Arc;

/// Shared request-handler state. The scorer wraps the immutable model
/// bundle loaded at startup; None means no model could be loaded or
/// trained, and prediction requests surface that as an error.
pub struct AppState {
    pub config: Config,
    pub scorer: Option<Arc<FraudScorer>>,
}
