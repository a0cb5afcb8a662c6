//! Voice registry.
//!
//! The registry is built once at startup from configuration and shared
//! read-only across requests. Voice order is insertion order and is what
//! `/v1/voices` and the `voices` capability report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voices shipped with the Orpheus model, in catalog order.
pub const BUILTIN_VOICES: &[&str] = &["tara", "leah", "jess", "leo", "dan", "mia", "zac", "zoe"];

/// Voice used when neither configuration nor the request names one.
pub const BUILTIN_DEFAULT_VOICE: &str = "tara";

/// Errors raised while building a registry from configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Voice registry must contain at least one voice")]
    Empty,

    #[error("Duplicate voice id: {0}")]
    DuplicateVoice(String),

    #[error("Invalid voice id '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidVoiceId(String),

    #[error("Default voice '{0}' is not in the voice registry")]
    UnknownDefault(String),
}

/// Voice entry as it appears in configuration.
///
/// `name` and `description` are derived from the id when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct VoiceSpec {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl VoiceSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// A synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Voice {
    /// The unique identifier for the voice
    #[cfg_attr(feature = "openapi", schema(example = "tara"))]
    pub id: String,
    /// The display name of the voice
    #[cfg_attr(feature = "openapi", schema(example = "Tara"))]
    pub name: String,
    /// A description of the voice
    #[cfg_attr(
        feature = "openapi",
        schema(example = "Orpheus TTS voice: tara (recommended)")
    )]
    pub description: String,
}

/// Ordered, immutable set of voices with one distinguished default.
#[derive(Debug, Clone)]
pub struct VoiceRegistry {
    voices: Vec<Voice>,
    default_voice: String,
}

impl VoiceRegistry {
    pub fn new(specs: Vec<VoiceSpec>, default_voice: &str) -> Result<Self, RegistryError> {
        if specs.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut voices: Vec<Voice> = Vec::with_capacity(specs.len());
        for spec in specs {
            if !is_path_safe(&spec.id) {
                return Err(RegistryError::InvalidVoiceId(spec.id));
            }
            if voices.iter().any(|v| v.id == spec.id) {
                return Err(RegistryError::DuplicateVoice(spec.id));
            }

            let is_default = spec.id == default_voice;
            let name = spec.name.unwrap_or_else(|| capitalize(&spec.id));
            let description = spec.description.unwrap_or_else(|| {
                let mut description = format!("Orpheus TTS voice: {}", spec.id);
                if is_default {
                    description.push_str(" (recommended)");
                }
                description
            });

            voices.push(Voice {
                id: spec.id,
                name,
                description,
            });
        }

        if !voices.iter().any(|v| v.id == default_voice) {
            return Err(RegistryError::UnknownDefault(default_voice.to_string()));
        }

        Ok(Self {
            voices,
            default_voice: default_voice.to_string(),
        })
    }

    /// Registry of the voices bundled with the model.
    pub fn builtin() -> Self {
        let specs = BUILTIN_VOICES.iter().map(|id| VoiceSpec::new(*id)).collect();
        match Self::new(specs, BUILTIN_DEFAULT_VOICE) {
            Ok(registry) => registry,
            Err(e) => unreachable!("builtin voice catalog is valid: {e}"),
        }
    }

    /// Voice identifiers in registry order.
    pub fn list_voices(&self) -> Vec<&str> {
        self.voices.iter().map(|v| v.id.as_str()).collect()
    }

    #[inline]
    pub fn is_valid(&self, id: &str) -> bool {
        self.voices.iter().any(|v| v.id == id)
    }

    #[inline]
    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn get(&self, id: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.id == id)
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// Voice ids end up in artifact paths and Content-Disposition headers.
fn is_path_safe(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
