//! OpenAPI document for the HTTP surface.
//!
//! Served at `GET /openapi.json`, or generated with
//! `orpheus-gateway openapi -f yaml|json [-o FILE]`.

use axum::Json;
use utoipa::OpenApi;

use crate::core::capabilities::{CapabilitiesResponse, Capability};
use crate::core::synthesis::SynthesisRequest;
use crate::core::voices::Voice;
use crate::errors::ErrorBody;
use crate::handlers::api::{ApiDescriptor, EndpointInfo, HealthResponse};
use crate::handlers::voices::VoicesResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orpheus TTS API",
        description = "OpenAI-compatible API for Orpheus TTS"
    ),
    paths(
        crate::handlers::api::root,
        crate::handlers::api::health_check,
        crate::handlers::speech::create_speech,
        crate::handlers::voices::list_voices,
        crate::handlers::capabilities::get_capabilities,
    ),
    components(schemas(
        ApiDescriptor,
        EndpointInfo,
        HealthResponse,
        SynthesisRequest,
        Voice,
        VoicesResponse,
        Capability,
        CapabilitiesResponse,
        ErrorBody,
    )),
    tags(
        (name = "speech", description = "Text-to-speech generation"),
        (name = "voices", description = "Voice catalog"),
        (name = "capabilities", description = "Supported features and parameters"),
        (name = "meta", description = "API descriptor"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Render the OpenAPI document as YAML.
pub fn spec_yaml() -> Result<String, Box<dyn std::error::Error>> {
    Ok(ApiDoc::openapi().to_yaml()?)
}

/// Render the OpenAPI document as pretty-printed JSON.
pub fn spec_json() -> Result<String, Box<dyn std::error::Error>> {
    Ok(ApiDoc::openapi().to_pretty_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_speech_path() {
        let json = spec_json().unwrap();
        assert!(json.contains("/v1/audio/speech"));
        assert!(json.contains("/v1/capabilities"));
        assert!(json.contains("SynthesisRequest"));
    }

    #[test]
    fn test_spec_yaml_renders() {
        let yaml = spec_yaml().unwrap();
        assert!(yaml.contains("openapi:"));
        assert!(yaml.contains("/v1/voices"));
    }
}
