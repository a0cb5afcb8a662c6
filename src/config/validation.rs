use super::{ServerConfig, TlsConfig, TlsSettings};
use crate::core::synthesis::{EngineKind, create_engine};
use crate::core::voices::VoiceRegistry;

/// Turn raw TLS settings into a [`TlsConfig`].
///
/// Both paths are required once TLS is enabled.
pub(super) fn resolve_tls(
    settings: TlsSettings,
) -> Result<Option<TlsConfig>, Box<dyn std::error::Error>> {
    if !settings.enabled {
        return Ok(None);
    }

    let cert_path = settings
        .cert_path
        .ok_or("TLS is enabled but no certificate path is set (TLS_CERT_PATH or server.tls.cert_path)")?;
    let key_path = settings
        .key_path
        .ok_or("TLS is enabled but no key path is set (TLS_KEY_PATH or server.tls.key_path)")?;

    Ok(Some(TlsConfig {
        cert_path,
        key_path,
    }))
}

/// Check that the voice catalog can be turned into a registry.
pub(super) fn validate_voices(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    VoiceRegistry::new(config.voices.clone(), &config.default_voice)
        .map(|_| ())
        .map_err(|e| format!("Invalid voice configuration: {e}").into())
}

/// Check that the configured engine has everything its kind needs.
pub(super) fn validate_engine(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let engine = &config.engine;
    match engine.kind {
        EngineKind::Command if engine.command.is_none() => {
            return Err(
                "Command engine selected but no program is set (ENGINE_COMMAND or engine.command)"
                    .into(),
            );
        }
        EngineKind::Http if engine.url.is_none() => {
            return Err(
                "HTTP engine selected but no worker URL is set (ENGINE_URL or engine.url)".into(),
            );
        }
        _ => {}
    }

    create_engine(engine)
        .map(|_| ())
        .map_err(|e| e.to_string().into())
}

/// Reject limits that would make every request fail.
pub(super) fn validate_limits(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.max_body_bytes == 0 {
        return Err("max_body_bytes must be greater than zero".into());
    }
    if config.engine.timeout_seconds == Some(0) {
        return Err("engine timeout_seconds must be greater than zero when set".into());
    }
    Ok(())
}
