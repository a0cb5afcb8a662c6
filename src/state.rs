use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::capabilities::CapabilityReport;
use crate::core::synthesis::{
    EngineError, RequestValidator, SpeechPipeline, SynthesisEngine, create_engine,
};
use crate::core::voices::{RegistryError, VoiceRegistry};

/// Errors raised while assembling the application state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid voice configuration: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to create synthesis engine: {0}")]
    Engine(#[from] EngineError),

    #[error("failed to prepare artifact directory {path}: {source}")]
    ArtifactDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Shared, read-only state handed to every handler.
///
/// Everything here is built once at startup; request handling never mutates it.
pub struct AppState {
    pub config: ServerConfig,
    pub registry: VoiceRegistry,
    pub capabilities: CapabilityReport,
    pub validator: RequestValidator,
    pub pipeline: SpeechPipeline,
}

impl AppState {
    /// Build state with the engine described by `config.engine`.
    pub async fn new(config: ServerConfig) -> Result<Arc<Self>, StartupError> {
        let engine = create_engine(&config.engine)?;
        Self::with_engine(config, engine).await
    }

    /// Build state around an already constructed engine.
    pub async fn with_engine(
        config: ServerConfig,
        engine: Arc<dyn SynthesisEngine>,
    ) -> Result<Arc<Self>, StartupError> {
        let registry = config.voice_registry()?;

        tokio::fs::create_dir_all(&config.artifact_dir)
            .await
            .map_err(|source| StartupError::ArtifactDir {
                path: config.artifact_dir.display().to_string(),
                source,
            })?;

        let capabilities = CapabilityReport::new(&registry, &config.generation);
        let validator =
            RequestValidator::new(config.generation.clone(), config.artifact_dir.clone());
        let pipeline = SpeechPipeline::new(engine);

        info!(
            engine = pipeline.engine_name(),
            voices = registry.voices().len(),
            default_voice = registry.default_voice(),
            artifact_dir = %config.artifact_dir.display(),
            "Application state initialized"
        );

        Ok(Arc::new(Self {
            config,
            registry,
            capabilities,
            validator,
            pipeline,
        }))
    }
}
