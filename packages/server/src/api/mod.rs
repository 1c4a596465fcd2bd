//! HTTP API
//!
//! JSON endpoints over the core services, grouped by concern:
//! - `node_endpoints`: node CRUD, filtered listing and facets
//! - `image_endpoints`: image upload/removal and upload progress
//! - `account_endpoints`: sign-up, sign-in and profiles
//!
//! Every response body is a `GatewayResponse` envelope whose `status`
//! matches the HTTP status.

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod account_endpoints;
mod http_error;
mod image_endpoints;
mod node_endpoints;

pub use http_error::HttpError;
pub use image_endpoints::FILE_NAME_HEADER;

/// Create the application router with all endpoint modules
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state.clone()))
        .merge(image_endpoints::routes(state.clone()))
        .merge(account_endpoints::routes(state))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured browser origins
///
/// Origins that are not valid header values are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static(FILE_NAME_HEADER),
        ])
        .expose_headers(Any)
        .allow_credentials(false)
}
