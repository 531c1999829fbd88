use axum::{
    Router,
    routing::{get, post},
};
use roadcall_pricing::{
    handlers::{catalog_handler, quote_handler},
    state::{AppConfig, AppState},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/quotes", post(quote_handler::calculate_quote))
        .route("/services", post(catalog_handler::create_service))
        .route("/services/:service_id", get(catalog_handler::get_service))
        .route("/garages", post(catalog_handler::create_garage))
        .route("/garages/:garage_id", get(catalog_handler::get_garage))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(app_state));

    tracing::info!("Listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
