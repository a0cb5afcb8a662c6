//! Configuration module for the Orpheus speech gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use orpheus_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::core::synthesis::{EngineConfig, GenerationDefaults};
use crate::core::voices::{RegistryError, VoiceRegistry, VoiceSpec};

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port
pub const DEFAULT_PORT: u16 = 8000;
/// Default request body limit (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// TLS configuration for HTTPS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// TLS settings as read from the environment or YAML, before validation.
#[derive(Debug, Clone, Default)]
pub(crate) struct TlsSettings {
    pub enabled: bool,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsConfig>,

    /// Comma-separated list of allowed origins, or `*` for any origin.
    /// `None` disables CORS headers entirely.
    pub cors_allowed_origins: Option<String>,
    pub max_body_bytes: usize,

    /// Directory where per-request WAV artifacts are written and removed.
    pub artifact_dir: PathBuf,

    pub voices: Vec<VoiceSpec>,
    pub default_voice: String,
    pub generation: GenerationDefaults,
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `.env`-provided and real environment variables and falls back to
    /// defaults. The result is validated before it is returned.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable fallback
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        // Note: .env file is loaded in main.rs at application startup
        let yaml_config = yaml::YamlConfig::from_file(path)?;

        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validation::validate_limits(self)?;
        validation::validate_voices(self)?;
        validation::validate_engine(self)?;
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Build the voice registry described by this configuration.
    pub fn voice_registry(&self) -> Result<VoiceRegistry, RegistryError> {
        VoiceRegistry::new(self.voices.clone(), &self.default_voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::synthesis::EngineKind;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            for key in [
                "HOST",
                "PORT",
                "TLS_ENABLED",
                "TLS_CERT_PATH",
                "TLS_KEY_PATH",
                "CORS_ALLOWED_ORIGINS",
                "MAX_BODY_BYTES",
                "ARTIFACT_DIR",
                "ORPHEUS_VOICES",
                "ORPHEUS_DEFAULT_VOICE",
                "ORPHEUS_MODEL",
                "ORPHEUS_TEMPERATURE",
                "ORPHEUS_TOP_P",
                "ORPHEUS_REPETITION_PENALTY",
                "ENGINE_KIND",
                "ENGINE_COMMAND",
                "ENGINE_ARGS",
                "ENGINE_URL",
                "ENGINE_API_KEY",
                "ENGINE_TIMEOUT_SECONDS",
            ] {
                env::remove_var(key);
            }
        }
    }

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();
        unsafe {
            env::set_var("ENGINE_COMMAND", "orpheus-cli");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.address(), "127.0.0.1:8000");
        assert!(!config.is_tls_enabled());
        assert_eq!(config.cors_allowed_origins.as_deref(), Some("*"));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.artifact_dir, env::temp_dir());
        assert_eq!(config.default_voice, "tara");
        assert_eq!(config.voices.len(), 8);
        assert_eq!(config.generation, GenerationDefaults::default());
        assert_eq!(config.engine.kind, EngineKind::Command);
        assert_eq!(config.engine.command.as_deref(), Some("orpheus-cli"));
        assert!(config.engine.args.is_empty());

        let registry = config.voice_registry().unwrap();
        assert_eq!(registry.default_voice(), "tara");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        cleanup_env_vars();
        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "9001");
            env::set_var("ORPHEUS_VOICES", "leo, zoe");
            env::set_var("ORPHEUS_DEFAULT_VOICE", "zoe");
            env::set_var("ORPHEUS_TEMPERATURE", "0.8");
            env::set_var("ENGINE_KIND", "http");
            env::set_var("ENGINE_URL", "http://127.0.0.1:5005/synthesize");
            env::set_var("ENGINE_API_KEY", "secret");
            env::set_var("ENGINE_TIMEOUT_SECONDS", "45");
        }

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.address(), "0.0.0.0:9001");
        assert_eq!(config.default_voice, "zoe");
        assert_eq!(
            config.voices,
            vec![VoiceSpec::new("leo"), VoiceSpec::new("zoe")]
        );
        assert_eq!(config.generation.temperature, 0.8);
        assert_eq!(config.engine.kind, EngineKind::Http);
        assert_eq!(config.engine.timeout_seconds, Some(45));
        assert_eq!(
            config.engine.api_key.as_ref().map(|k| k.as_str()),
            Some("secret")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("ENGINE_COMMAND", "orpheus-cli");
        }

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid value for PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_engine_command() {
        cleanup_env_vars();

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("ENGINE_COMMAND"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_unknown_default_voice() {
        cleanup_env_vars();
        unsafe {
            env::set_var("ENGINE_COMMAND", "orpheus-cli");
            env::set_var("ORPHEUS_DEFAULT_VOICE", "nobody");
        }

        let err = ServerConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid voice configuration"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_only() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
server:
  host: "0.0.0.0"
  port: 8080

voices:
  default: "leo"
  available:
    - "tara"
    - id: "leo"
      description: "Warm male voice"

engine:
  command: "python"
  args: ["gguf_orpheus.py", "--text", "{text}", "--output", "{output}"]

artifacts:
  dir: "/tmp/orpheus-artifacts"
"#,
        );

        let config = ServerConfig::from_file(&config_path).unwrap();

        assert_eq!(config.address(), "0.0.0.0:8080");
        assert_eq!(config.default_voice, "leo");
        assert_eq!(config.voices.len(), 2);
        assert_eq!(config.engine.command.as_deref(), Some("python"));
        assert_eq!(config.engine.args.len(), 5);
        assert_eq!(config.artifact_dir, PathBuf::from("/tmp/orpheus-artifacts"));

        let registry = config.voice_registry().unwrap();
        assert_eq!(registry.list_voices(), vec!["tara", "leo"]);
        assert_eq!(
            registry.get("leo").unwrap().description,
            "Warm male voice"
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();
        unsafe {
            env::set_var("PORT", "7000");
            env::set_var("ENGINE_COMMAND", "env-cli");
            env::set_var("ORPHEUS_TOP_P", "0.5");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
server:
  port: 7500

generation:
  repetition_penalty: 1.3

engine:
  command: "yaml-cli"
"#,
        );

        let config = ServerConfig::from_file(&config_path).unwrap();

        assert_eq!(config.port, 7500);
        assert_eq!(config.engine.command.as_deref(), Some("yaml-cli"));
        // Env values survive where YAML is silent
        assert_eq!(config.generation.top_p, 0.5);
        assert_eq!(config.generation.repetition_penalty, 1.3);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_tls_requires_paths() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
server:
  tls:
    enabled: true
    cert_path: "/certs/cert.pem"

engine:
  command: "orpheus-cli"
"#,
        );

        let err = ServerConfig::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("TLS_KEY_PATH"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_tls_enabled() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
server:
  tls:
    enabled: true
    cert_path: "/certs/cert.pem"
    key_path: "/certs/key.pem"

engine:
  command: "orpheus-cli"
"#,
        );

        let config = ServerConfig::from_file(&config_path).unwrap();
        assert!(config.is_tls_enabled());
        assert_eq!(
            config.tls,
            Some(TlsConfig {
                cert_path: PathBuf::from("/certs/cert.pem"),
                key_path: PathBuf::from("/certs/key.pem"),
            })
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_engine_url() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
engine:
  kind: "http"
  url: "not a url"
"#,
        );

        assert!(ServerConfig::from_file(&config_path).is_err());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_zero_body_limit() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = write_config(
            &temp_dir,
            r#"
security:
  max_body_bytes: 0

engine:
  command: "orpheus-cli"
"#,
        );

        let err = ServerConfig::from_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("max_body_bytes"));

        cleanup_env_vars();
    }
}
