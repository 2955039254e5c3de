//! # formwork-api: Axum Request Surface
//!
//! Demonstrates schema validation at the request boundary: query strings
//! and JSON bodies are validated against records from `formwork-schema`,
//! and failures come back as one structured 422 listing every field.
//!
//! ## API Surface
//!
//! | Route                    | Module                | Notes                        |
//! |--------------------------|-----------------------|------------------------------|
//! | `GET /health/liveness`   | here                  | always `ok`                  |
//! | `GET /health/readiness`  | here                  | always `ready`               |
//! | `/v1/entries*`           | [`routes::entries`]   | pagination + date range      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsLayer → Handler
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.origins());

    let api = Router::new()
        .merge(routes::entries::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// CORS policy from the configured origin list. An empty list allows no
/// cross-origin access; origins that are not valid header values are
/// skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: config was validated before the router existed.
async fn readiness() -> &'static str {
    "ready"
}
