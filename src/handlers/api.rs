use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

pub const API_NAME: &str = "Orpheus TTS API";
pub const API_DESCRIPTION: &str = "OpenAI-compatible API for Orpheus TTS";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    #[cfg_attr(feature = "openapi", schema(example = "OK"))]
    pub status: String,
}

/// One entry of the endpoint listing served at `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EndpointInfo {
    #[cfg_attr(feature = "openapi", schema(example = "/v1/audio/speech"))]
    pub path: String,
    #[cfg_attr(feature = "openapi", schema(example = "POST"))]
    pub method: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiDescriptor {
    #[cfg_attr(feature = "openapi", schema(example = "Orpheus TTS API"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "0.1.0"))]
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

impl ApiDescriptor {
    pub fn current() -> Self {
        let endpoint = |path: &str, method: &str, description: &str| EndpointInfo {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        };

        Self {
            name: API_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: API_DESCRIPTION.to_string(),
            endpoints: vec![
                endpoint("/v1/audio/speech", "POST", "Generate speech from text"),
                endpoint("/v1/voices", "GET", "List available voices"),
                endpoint("/v1/capabilities", "GET", "Get system capabilities"),
            ],
        }
    }
}

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/",
        responses(
            (status = 200, description = "API name, version and endpoint listing", body = ApiDescriptor)
        ),
        tag = "meta"
    )
)]
pub async fn root() -> Json<ApiDescriptor> {
    Json(ApiDescriptor::current())
}

#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        get,
        path = "/health",
        responses(
            (status = 200, description = "Server is healthy", body = HealthResponse)
        ),
        tag = "health"
    )
)]
pub async fn health_check(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
