use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, capabilities, speech, voices};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
///
/// CORS, security headers and the body limit are applied in `create_app`.
pub fn create_api_router() -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health_check))
        .route("/v1/audio/speech", post(speech::create_speech))
        .route("/v1/voices", get(voices::list_voices))
        .route("/v1/capabilities", get(capabilities::get_capabilities));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", get(crate::docs::openapi::openapi_json));

    router.layer(TraceLayer::new_for_http())
}
