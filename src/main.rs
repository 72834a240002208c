// Initialize configuration
// Set up logging
// Open the on-disk transaction cache
// Load the persisted model bundle, or train one from the labeled dataset
// Start HTTP server

use fraud_score_service::{
    api, blockchain::EtherscanClient, cache, config::Config, dataset, features, ml,
    service::FraudScorer, state::AppState,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fraud-score-service");

    let config = Config::from_env();

    let store = cache::CacheStore::connect(&config.cache_dir).await?;
    info!("Transaction cache store opened under {:?}", config.cache_dir);

    let provider = Arc::new(EtherscanClient::new(&config)?);
    let fetcher = Arc::new(cache::TransactionFetcher::new(
        provider,
        store,
        config.cache_max_capacity,
        config.retry_policy(),
    ));

    let scorer = match load_or_train(&config) {
        Ok(bundle) => Some(Arc::new(FraudScorer::new(
            Arc::new(bundle),
            fetcher.clone(),
            config.start_block,
            config.end_block,
        ))),
        Err(e) => {
            error!("No model available, predictions will fail until retrained: {}", e);
            None
        }
    };

    let app_state = Arc::new(AppState {
        config: config.clone(),
        scorer,
    });

    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    Ok(())
}

/// Load the persisted bundle when present, otherwise train from the
/// labeled dataset and persist the result. Model, imputer and column
/// order always travel together.
fn load_or_train(config: &Config) -> Result<ml::ModelBundle, Box<dyn std::error::Error>> {
    if config.model_path.exists() {
        match ml::ModelBundle::load(&config.model_path) {
            Ok(bundle) => {
                info!(
                    "Loaded model bundle from {:?} (trained at {})",
                    config.model_path, bundle.trained_at
                );
                return Ok(bundle);
            }
            Err(e) => warn!("Failed to load model bundle: {}; retraining", e),
        }
    }

    info!("Training new model from {:?}", config.dataset_path);
    let rows = dataset::load_rows(&config.dataset_path)?;
    let build = dataset::build(&rows)?;
    let trained = ml::train(&build.matrix, &build.labels)?;

    info!(
        "Validation: accuracy {:.4}, macro-F1 {:.4}, confusion {:?}",
        trained.report.accuracy, trained.report.macro_f1, trained.report.confusion
    );
    for (name, importance) in features::schema_columns()
        .iter()
        .zip(trained.model.feature_importances().iter())
    {
        info!("Feature importance: {} = {:.4}", name, importance);
    }

    let bundle = ml::ModelBundle::new(features::schema_columns(), build.imputer, trained);
    bundle.save(&config.model_path)?;

    Ok(bundle)
}
