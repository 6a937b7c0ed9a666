//! Route configuration and setup.
//!
//! Route groups live in [domains](domains). The server and the Lambda entry
//! point share them and differ only in prefix, CORS and the docs routes.

mod domains;

use crate::api_doc::get_openapi_spec;
use crate::constants::{API_PREFIX, OPENAPI_PATH};
use crate::error::redact_upstream_errors;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use iris_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use domains::api_routes;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Server routes: everything under `/api`, plus the OpenAPI document and RapiDoc at `/docs`.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let routes = api_routes(API_PREFIX)
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"));

    Ok(apply_layers(routes, config, cors).with_state(state))
}

/// Lambda routes: the same handlers at the root, with CORS open to any origin.
pub fn lambda_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    apply_layers(api_routes(""), config, permissive_cors()).with_state(state)
}

fn apply_layers(
    routes: Router<Arc<AppState>>,
    config: &Config,
    cors: CorsLayer,
) -> Router<Arc<AppState>> {
    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    let body_limit = config.max_file_size_bytes() + MULTIPART_OVERHEAD_BYTES;
    tracing::info!(
        http_concurrency_limit,
        body_limit,
        "HTTP concurrency and body limit layers enabled"
    );

    let routes = if config.is_production() {
        routes.layer(axum::middleware::from_fn(redact_upstream_errors))
    } else {
        routes
    };

    // DefaultBodyLimit surfaces oversize multipart reads as a JSON 413 from
    // the handler; RequestBodyLimitLayer is the hard cap on what is read at all.
    routes
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(body_limit * 2))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}

fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        permissive_cors()
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
