//! Static capability descriptors served by `/v1/capabilities`.
//!
//! The report is rendered once at startup. Parameter ranges are published
//! for clients; the request validator does not enforce them.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::core::synthesis::GenerationDefaults;
use crate::core::voices::VoiceRegistry;

/// Emotion tags the engine understands inside input text.
pub const EMOTION_TAGS: &[&str] = &[
    "<laugh>",
    "<chuckle>",
    "<sigh>",
    "<cough>",
    "<sniffle>",
    "<groan>",
    "<yawn>",
    "<gasp>",
];

/// Advisory `(min, max)` ranges for the sampling controls
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 1.0);
pub const TOP_P_RANGE: (f64, f64) = (0.0, 1.0);
pub const REPETITION_PENALTY_RANGE: (f64, f64) = (1.0, 2.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Capability {
    /// Name of the capability
    #[cfg_attr(feature = "openapi", schema(example = "emotion_tags"))]
    pub name: String,
    /// Description of the capability
    pub description: String,
    /// Additional options and parameters for the capability
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub options: Map<String, Value>,
}

impl Capability {
    fn new(name: &str, description: &str, options: Value) -> Self {
        let options = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.to_string(),
            description: description.to_string(),
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CapabilitiesResponse {
    /// List of capabilities supported by the Orpheus TTS system
    pub capabilities: Vec<Capability>,
}

/// Capability descriptors in reporting order: voices, emotion_tags, parameters.
#[derive(Debug, Clone)]
pub struct CapabilityReport {
    response: CapabilitiesResponse,
}

impl CapabilityReport {
    pub fn new(registry: &VoiceRegistry, defaults: &GenerationDefaults) -> Self {
        let voices = Capability::new(
            "voices",
            "Available voices for speech synthesis",
            json!({
                "available_voices": registry.list_voices(),
                "default_voice": registry.default_voice(),
            }),
        );

        let emotion_tags = Capability::new(
            "emotion_tags",
            "Emotion tags that can be included in the text",
            json!({ "tags": EMOTION_TAGS }),
        );

        let parameters = Capability::new(
            "parameters",
            "Adjustable parameters for speech generation",
            json!({
                "temperature": parameter(
                    defaults.temperature,
                    TEMPERATURE_RANGE,
                    "Controls randomness in generation",
                ),
                "top_p": parameter(
                    defaults.top_p,
                    TOP_P_RANGE,
                    "Controls diversity of generation",
                ),
                "repetition_penalty": parameter(
                    defaults.repetition_penalty,
                    REPETITION_PENALTY_RANGE,
                    "Penalizes repetition (>=1.1 required for stable generation)",
                ),
            }),
        );

        Self {
            response: CapabilitiesResponse {
                capabilities: vec![voices, emotion_tags, parameters],
            },
        }
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.response.capabilities
    }

    pub fn response(&self) -> &CapabilitiesResponse {
        &self.response
    }
}

fn parameter(default: f64, (min, max): (f64, f64), description: &str) -> Value {
    json!({
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}
