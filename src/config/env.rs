use std::path::PathBuf;

use zeroize::Zeroizing;

use super::utils::{env_var, parse_bool, parse_env, split_list};
use super::{DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, ServerConfig, TlsSettings};
use crate::core::synthesis::{EngineConfig, EngineKind, GenerationDefaults};
use crate::core::voices::{BUILTIN_DEFAULT_VOICE, BUILTIN_VOICES, VoiceSpec};

/// Build a configuration from environment variables and defaults.
///
/// TLS is reported as raw settings so validation can name missing paths.
pub(super) fn load_from_env()
-> Result<(ServerConfig, TlsSettings), Box<dyn std::error::Error>> {
    let host = env_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = parse_env::<u16>("PORT")?.unwrap_or(DEFAULT_PORT);

    let tls = TlsSettings {
        enabled: match env_var("TLS_ENABLED") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| format!("Invalid value for TLS_ENABLED: '{raw}'"))?,
            None => false,
        },
        cert_path: env_var("TLS_CERT_PATH").map(PathBuf::from),
        key_path: env_var("TLS_KEY_PATH").map(PathBuf::from),
    };

    // The HTTP API has historically been open to browser clients.
    let cors_allowed_origins =
        Some(env_var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()));
    let max_body_bytes =
        parse_env::<usize>("MAX_BODY_BYTES")?.unwrap_or(DEFAULT_MAX_BODY_BYTES);

    let artifact_dir = env_var("ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let voices = match env_var("ORPHEUS_VOICES") {
        Some(raw) => split_list(&raw).into_iter().map(VoiceSpec::new).collect(),
        None => BUILTIN_VOICES.iter().map(|id| VoiceSpec::new(*id)).collect(),
    };
    let default_voice =
        env_var("ORPHEUS_DEFAULT_VOICE").unwrap_or_else(|| BUILTIN_DEFAULT_VOICE.to_string());

    let builtin = GenerationDefaults::default();
    let generation = GenerationDefaults {
        model: env_var("ORPHEUS_MODEL").unwrap_or(builtin.model),
        response_format: builtin.response_format,
        speed: builtin.speed,
        temperature: parse_env("ORPHEUS_TEMPERATURE")?.unwrap_or(builtin.temperature),
        top_p: parse_env("ORPHEUS_TOP_P")?.unwrap_or(builtin.top_p),
        repetition_penalty: parse_env("ORPHEUS_REPETITION_PENALTY")?
            .unwrap_or(builtin.repetition_penalty),
    };

    let engine = EngineConfig {
        kind: parse_env::<EngineKind>("ENGINE_KIND")?.unwrap_or_default(),
        command: env_var("ENGINE_COMMAND"),
        args: env_var("ENGINE_ARGS")
            .map(|raw| raw.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        url: env_var("ENGINE_URL"),
        api_key: env_var("ENGINE_API_KEY").map(Zeroizing::new),
        timeout_seconds: parse_env("ENGINE_TIMEOUT_SECONDS")?,
    };

    let config = ServerConfig {
        host,
        port,
        tls: None,
        cors_allowed_origins,
        max_body_bytes,
        artifact_dir,
        voices,
        default_voice,
        generation,
        engine,
    };

    Ok((config, tls))
}
