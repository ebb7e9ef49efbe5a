mod error;
mod extract;
pub mod handlers;
pub mod types;

pub use extract::Authenticated;
pub use handlers::AppState;

use crate::{
    Result, auth,
    classifier::{Classifier, HttpClassifier},
    config::Config,
    prediction::PredictionService,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    Router::new()
        .route("/", get(handlers::health))
        .route("/token", post(handlers::login))
        .route("/predict/", post(handlers::predict))
        .route("/predict-multiple/", post(handlers::predict_multiple))
        .route("/predict-csv/", post(handlers::predict_csv))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn build_state(config: &Config, classifier: Arc<dyn Classifier>) -> Result<AppState> {
    let auth = auth::from_config(&config.auth)?;

    Ok(AppState {
        auth: Arc::new(auth),
        predictions: Arc::new(PredictionService::new(classifier)),
        max_body_bytes: config.server.max_body_bytes,
    })
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize classifier
    let classifier = HttpClassifier::new(config.classifier.clone())?;
    info!("Using classifier endpoint: {}", config.classifier.url);

    // Create application state
    let app_state = build_state(&config, Arc::new(classifier))?;
    info!(
        "Loaded {} accounts, token TTL {} minutes",
        config.auth.users.len(),
        config.auth.token_ttl_minutes
    );

    // Create router
    let app = router(app_state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!(
        "Starting server on {} (max body {} bytes)",
        addr, config.server.max_body_bytes
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
