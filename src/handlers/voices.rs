use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::core::voices::Voice;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoicesResponse {
    /// Voices in registry order
    pub voices: Vec<Voice>,
}

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/v1/voices",
        responses(
            (status = 200, description = "Available voices", body = VoicesResponse)
        ),
        tag = "voices"
    )
)]
pub async fn list_voices(State(state): State<Arc<AppState>>) -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: state.registry.voices().to_vec(),
    })
}
