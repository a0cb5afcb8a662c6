use std::path::PathBuf;

use zeroize::Zeroizing;

use super::env::load_from_env;
use super::validation::resolve_tls;
use super::yaml::YamlConfig;
use super::ServerConfig;
use crate::core::voices::VoiceSpec;

/// Merge environment configuration (base) with optional YAML overrides.
///
/// YAML values win over environment variables; anything left unset falls
/// back to the environment or the built-in defaults.
pub(super) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let (mut config, mut tls) = load_from_env()?;

    let Some(yaml) = yaml else {
        config.tls = resolve_tls(tls)?;
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(tls_yaml) = server.tls {
            if let Some(enabled) = tls_yaml.enabled {
                tls.enabled = enabled;
            }
            if let Some(cert) = tls_yaml.cert_path {
                tls.cert_path = Some(PathBuf::from(cert));
            }
            if let Some(key) = tls_yaml.key_path {
                tls.key_path = Some(PathBuf::from(key));
            }
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins).filter(|o| !o.trim().is_empty());
        }
        if let Some(limit) = security.max_body_bytes {
            config.max_body_bytes = limit;
        }
    }

    if let Some(voices) = yaml.voices {
        if let Some(available) = voices.available {
            config.voices = available.into_iter().map(VoiceSpec::from).collect();
        }
        if let Some(default) = voices.default {
            config.default_voice = default;
        }
    }

    if let Some(generation) = yaml.generation {
        let defaults = &mut config.generation;
        if let Some(model) = generation.model {
            defaults.model = model;
        }
        if let Some(speed) = generation.speed {
            defaults.speed = speed;
        }
        if let Some(temperature) = generation.temperature {
            defaults.temperature = temperature;
        }
        if let Some(top_p) = generation.top_p {
            defaults.top_p = top_p;
        }
        if let Some(penalty) = generation.repetition_penalty {
            defaults.repetition_penalty = penalty;
        }
    }

    if let Some(engine) = yaml.engine {
        let target = &mut config.engine;
        if let Some(kind) = engine.kind {
            target.kind = kind;
        }
        if let Some(command) = engine.command {
            target.command = Some(command);
        }
        if let Some(args) = engine.args {
            target.args = args;
        }
        if let Some(url) = engine.url {
            target.url = Some(url);
        }
        if let Some(key) = engine.api_key {
            target.api_key = Some(Zeroizing::new(key));
        }
        if let Some(timeout) = engine.timeout_seconds {
            target.timeout_seconds = Some(timeout);
        }
    }

    if let Some(dir) = yaml.artifacts.and_then(|a| a.dir) {
        config.artifact_dir = PathBuf::from(dir);
    }

    config.tls = resolve_tls(tls)?;
    Ok(config)
}
