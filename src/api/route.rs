use crate::{
    api::{error::ApiError, response::HealthResponse},
    ml::MODEL_TYPE,
    models::Prediction,
    state::AppState,
    validation::validate_eth_address,
};
use axum::{
    extract::{Json, State},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

// POST /api/predict_fraud request body
#[derive(Deserialize)]
pub struct PredictRequest {
    pub contract_address: Option<String>,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/predict_fraud", post(predict_fraud))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// POST /api/predict_fraud handler
async fn predict_fraud(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Prediction>, ApiError> {
    let address = request
        .contract_address
        .as_deref()
        .map(str::trim)
        .unwrap_or("");
    if address.is_empty() {
        return Err(ApiError::MissingAddress);
    }
    validate_eth_address(address)?;

    let scorer = state.scorer.as_ref().ok_or(ApiError::ModelNotLoaded)?;

    info!("Processing prediction request for {}", address);
    let prediction = scorer.score(address).await?;
    Ok(Json(prediction))
}

// GET /api/health handler
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.scorer.is_some(),
        model_type: MODEL_TYPE,
    })
}
