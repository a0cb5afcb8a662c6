use serde::Deserialize;
use std::path::PathBuf;

use crate::core::synthesis::EngineKind;
use crate::core::voices::VoiceSpec;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///   tls:
///     enabled: false
///
/// security:
///   cors_allowed_origins: "*"
///   max_body_bytes: 1048576
///
/// voices:
///   default: "tara"
///   available:
///     - "tara"
///     - "leo"
///     - id: "narrator"
///       name: "Narrator"
///       description: "Fine-tuned storytelling voice"
///
/// generation:
///   model: "orpheus-tts"
///   temperature: 0.6
///   top_p: 0.9
///   repetition_penalty: 1.1
///
/// engine:
///   kind: "command"
///   command: "python"
///   args: ["gguf_orpheus.py", "--text", "{text}", "--voice", "{voice}", "--output", "{output}"]
///   timeout_seconds: 120
///
/// artifacts:
///   dir: "/var/tmp/orpheus"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub security: Option<SecurityYaml>,
    pub voices: Option<VoicesYaml>,
    pub generation: Option<GenerationYaml>,
    pub engine: Option<EngineYaml>,
    pub artifacts: Option<ArtifactsYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub max_body_bytes: Option<usize>,
}

/// Voice catalog from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct VoicesYaml {
    pub default: Option<String>,
    pub available: Option<Vec<VoiceYaml>>,
}

/// A voice entry: either a bare id or a full record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VoiceYaml {
    Id(String),
    Detailed(VoiceSpec),
}

impl From<VoiceYaml> for VoiceSpec {
    fn from(voice: VoiceYaml) -> Self {
        match voice {
            VoiceYaml::Id(id) => VoiceSpec::new(id),
            VoiceYaml::Detailed(spec) => spec,
        }
    }
}

/// Generation defaults from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GenerationYaml {
    pub model: Option<String>,
    pub speed: Option<f64>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub repetition_penalty: Option<f64>,
}

/// Synthesis engine configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineYaml {
    pub kind: Option<EngineKind>,
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Artifact storage configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ArtifactsYaml {
    pub dir: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
