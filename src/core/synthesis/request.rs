//! Request and job types for `/v1/audio/speech`.

use serde::{Deserialize, Serialize};

use super::artifact::ArtifactPath;

/// The only response format the engine produces.
pub const SUPPORTED_RESPONSE_FORMAT: &str = "wav";

/// Model name echoed back when the client does not send one.
pub const DEFAULT_MODEL: &str = "orpheus-tts";

pub const DEFAULT_TEMPERATURE: f64 = 0.6;
pub const DEFAULT_TOP_P: f64 = 0.9;
pub const DEFAULT_REPETITION_PENALTY: f64 = 1.1;
pub const DEFAULT_SPEED: f64 = 1.0;

/// Values applied to request fields the client left out.
///
/// Loaded once from configuration and handed to the validator and the
/// capability report.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    pub model: String,
    pub response_format: String,
    pub speed: f64,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            response_format: SUPPORTED_RESPONSE_FORMAT.to_string(),
            speed: DEFAULT_SPEED,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            repetition_penalty: DEFAULT_REPETITION_PENALTY,
        }
    }
}

/// Request body for POST /v1/audio/speech.
///
/// Mirrors the OpenAI speech request with three extra sampling controls.
/// Only `input` is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SynthesisRequest {
    /// The TTS model to use (informational)
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "orpheus-tts"))]
    pub model: Option<String>,
    /// The text to generate audio for. May contain emotion tags such as `<laugh>`.
    #[cfg_attr(
        feature = "openapi",
        schema(example = "Hello, this is a test of the Orpheus text-to-speech system.")
    )]
    pub input: String,
    /// The voice to use for the generated audio
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "tara"))]
    pub voice: Option<String>,
    /// The format of the generated audio
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "wav"))]
    pub response_format: Option<String>,
    /// The speed of the generated audio (accepted, not applied)
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 1.0))]
    pub speed: Option<f64>,
    /// Controls randomness in generation (0.0 to 1.0)
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 0.6))]
    pub temperature: Option<f64>,
    /// Controls diversity of generation (0.0 to 1.0)
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 0.9))]
    pub top_p: Option<f64>,
    /// Penalizes repetition (>=1.1 required for stable generation)
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = 1.1))]
    pub repetition_penalty: Option<f64>,
}

impl SynthesisRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = Some(format.into());
        self
    }
}

/// Sampling controls forwarded to the engine untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

/// A validated request with every default resolved.
///
/// Created by the validator and consumed once by the pipeline.
#[derive(Debug)]
pub struct SynthesisJob {
    pub model: String,
    pub input: String,
    pub voice: String,
    pub response_format: String,
    pub speed: f64,
    pub params: GenerationParams,
    /// `%Y%m%d_%H%M%S` stamp shared by the artifact and the download filename
    pub timestamp: String,
    pub artifact: ArtifactPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_minimal_deserialization() {
        let request: SynthesisRequest = serde_json::from_str(r#"{"input": "Hi"}"#).unwrap();
        assert_eq!(request.input, "Hi");
        assert!(request.model.is_none());
        assert!(request.voice.is_none());
        assert!(request.response_format.is_none());
        assert!(request.temperature.is_none());
    }

    #[test]
    fn test_request_full_deserialization() {
        let json = r#"{
            "model": "orpheus-tts",
            "input": "Hello, this is a test with emotion tags. <laugh> Isn't that fun?",
            "voice": "leo",
            "response_format": "wav",
            "speed": 1.5,
            "temperature": 0.7,
            "top_p": 0.95,
            "repetition_penalty": 1.3
        }"#;

        let request: SynthesisRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.voice.as_deref(), Some("leo"));
        assert_eq!(request.speed, Some(1.5));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_p, Some(0.95));
        assert_eq!(request.repetition_penalty, Some(1.3));
    }

    #[test]
    fn test_request_missing_input_rejected() {
        let result: Result<SynthesisRequest, _> = serde_json::from_str(r#"{"voice": "tara"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_generation_defaults() {
        let defaults = GenerationDefaults::default();
        assert_eq!(defaults.model, "orpheus-tts");
        assert_eq!(defaults.response_format, "wav");
        assert_eq!(defaults.temperature, 0.6);
        assert_eq!(defaults.top_p, 0.9);
        assert_eq!(defaults.repetition_penalty, 1.1);
    }
}
