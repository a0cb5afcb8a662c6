//! Speech request validation.
//!
//! Checks run in a fixed order and stop at the first failure: empty input,
//! unknown voice, unsupported format. Sampling values are passed through
//! without range checks; the published ranges are advisory.

use std::path::PathBuf;

use thiserror::Error;

use super::artifact::{ArtifactPath, generation_timestamp};
use super::request::{
    GenerationDefaults, GenerationParams, SUPPORTED_RESPONSE_FORMAT, SynthesisJob,
    SynthesisRequest,
};
use crate::core::voices::VoiceRegistry;

/// Client-side request errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Text input is required")]
    InvalidInput,

    #[error("Voice '{0}' not available. Use /v1/voices to see available voices.")]
    UnknownVoice(String),

    #[error("Only 'wav' response format is supported")]
    UnsupportedFormat,
}

/// Turns raw requests into [`SynthesisJob`]s.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    defaults: GenerationDefaults,
    artifact_dir: PathBuf,
}

impl RequestValidator {
    pub fn new(defaults: GenerationDefaults, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            defaults,
            artifact_dir: artifact_dir.into(),
        }
    }

    pub fn validate(
        &self,
        registry: &VoiceRegistry,
        request: SynthesisRequest,
    ) -> Result<SynthesisJob, ValidationError> {
        if request.input.is_empty() {
            return Err(ValidationError::InvalidInput);
        }

        let voice = request
            .voice
            .unwrap_or_else(|| registry.default_voice().to_string());
        if !registry.is_valid(&voice) {
            return Err(ValidationError::UnknownVoice(voice));
        }

        let response_format = request
            .response_format
            .unwrap_or_else(|| self.defaults.response_format.clone());
        if response_format != SUPPORTED_RESPONSE_FORMAT {
            return Err(ValidationError::UnsupportedFormat);
        }

        let params = GenerationParams {
            temperature: request.temperature.unwrap_or(self.defaults.temperature),
            top_p: request.top_p.unwrap_or(self.defaults.top_p),
            repetition_penalty: request
                .repetition_penalty
                .unwrap_or(self.defaults.repetition_penalty),
        };

        let timestamp = generation_timestamp();
        let artifact = ArtifactPath::generate(&self.artifact_dir, &voice, &timestamp);

        Ok(SynthesisJob {
            model: request.model.unwrap_or_else(|| self.defaults.model.clone()),
            input: request.input,
            voice,
            response_format,
            speed: request.speed.unwrap_or(self.defaults.speed),
            params,
            timestamp,
            artifact,
        })
    }
}
