//! Route groups, mounted under a prefix (`/api` on the server, none on Lambda).

use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn image_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/images/upload", prefix),
            post(handlers::images::upload_image),
        )
        .route(
            &format!("{}/images/presign", prefix),
            post(handlers::images::presign_upload),
        )
        .route(&format!("{}/images", prefix), get(handlers::images::list_images))
        .route(
            &format!("{}/images/stats", prefix),
            get(handlers::images::image_stats),
        )
        .route(&format!("{}/stats", prefix), get(handlers::images::image_stats))
        .route(
            &format!("{}/images/{{id}}", prefix),
            get(handlers::images::get_image).delete(handlers::images::delete_image),
        )
}

pub fn analysis_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/analysis/{{id}}/analyze", prefix),
            post(handlers::analysis::analyze_image),
        )
        .route(
            &format!("{}/analysis/{{id}}", prefix),
            get(handlers::analysis::get_analysis),
        )
}

pub fn health_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/health", prefix),
        get(handlers::health::health_check),
    )
}

/// Every IRIS route under `prefix`
pub fn api_routes(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .merge(image_routes(prefix))
        .merge(analysis_routes(prefix))
        .merge(health_routes(prefix))
}
