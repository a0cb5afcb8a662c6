use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use http::{
    HeaderValue, Method,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// Assemble the full application: routes, state and the outer layers.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors_layer = cors_layer(state.config.cors_allowed_origins.as_deref());
    let max_body_bytes = state.config.max_body_bytes;

    // Security headers
    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    routes::api::create_api_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors_layer)
        .layer(security_headers)
}

/// Build the CORS layer for a configured origin list.
///
/// `*` allows any origin, a comma-separated list allows exactly those
/// origins, and `None` leaves cross-origin requests unanswered.
pub fn cors_layer(origins: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    match origins.map(str::trim) {
        Some("*") => base.allow_origin(Any),
        Some(list) => {
            let origins: Vec<HeaderValue> = list
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            base.allow_origin(origins)
        }
        None => {
            info!("CORS not configured, cross-origin requests will be blocked");
            base
        }
    }
}
