use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::core::capabilities::CapabilitiesResponse;
use crate::state::AppState;

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/v1/capabilities",
        responses(
            (status = 200, description = "Voices, emotion tags and generation parameters", body = CapabilitiesResponse)
        ),
        tag = "capabilities"
    )
)]
pub async fn get_capabilities(State(state): State<Arc<AppState>>) -> Json<CapabilitiesResponse> {
    Json(state.capabilities.response().clone())
}
