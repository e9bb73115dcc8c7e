use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use handlers::AppState;

/// Build the gateway router: open auth/health routes plus the proxied and
/// ingestion routes behind the quota gate (auth -> quota -> cache -> handler).
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/foods", get(handlers::foods::search_foods))
        .route("/foods/:fdc_id", get(handlers::foods::food_details))
        .route("/user-foods", post(handlers::foods::add_user_food))
        .route_layer(from_fn_with_state(state.clone(), middleware::quota::quota_gate));

    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/health", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
