//! Synthesis pipeline: invoke the engine, read the artifact back, delete it.
//!
//! Every job runs in its own tokio task. The caller only awaits the task's
//! handle, so a dropped HTTP request does not abort a job halfway: the task
//! runs to completion and the artifact is released either way.

use std::io::{self, Cursor};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::artifact::Artifact;
use super::encoder::SpeechAudio;
use super::engine::{EngineError, EngineRequest, SynthesisEngine};
use super::request::SynthesisJob;

/// Server-side synthesis failures
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Audio artifact I/O failed: {0}")]
    ArtifactIo(#[source] io::Error),

    #[error("Synthesis task failed: {0}")]
    TaskFailed(String),
}

#[derive(Clone)]
pub struct SpeechPipeline {
    engine: Arc<dyn SynthesisEngine>,
}

impl SpeechPipeline {
    pub fn new(engine: Arc<dyn SynthesisEngine>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Run `job` to completion and return the audio it produced.
    pub async fn synthesize(&self, job: SynthesisJob) -> Result<SpeechAudio, SynthesisError> {
        let voice = job.voice.clone();
        let timestamp = job.timestamp.clone();
        let engine = Arc::clone(&self.engine);

        let task = tokio::spawn(run_job(engine, job));
        let bytes = match task.await {
            Ok(result) => result?,
            Err(e) => {
                error!(voice = %voice, error = %e, "Synthesis task aborted");
                return Err(SynthesisError::TaskFailed(e.to_string()));
            }
        };

        Ok(SpeechAudio::new(bytes, voice, timestamp))
    }
}

async fn run_job(
    engine: Arc<dyn SynthesisEngine>,
    job: SynthesisJob,
) -> Result<Bytes, SynthesisError> {
    let SynthesisJob {
        input,
        voice,
        params,
        artifact,
        ..
    } = job;

    let artifact = Artifact::reserve(artifact);
    let request = EngineRequest::new(input, voice, artifact.path(), params);

    let start = Instant::now();
    let outcome = match engine.synthesize(&request).await {
        Ok(()) => artifact.read_all().await.map_err(SynthesisError::ArtifactIo),
        Err(e) => Err(SynthesisError::Engine(e)),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let cleanup = artifact.release().await;

    match (outcome, cleanup) {
        (Ok(bytes), Ok(())) => {
            inspect_wav(&bytes, &request.voice);
            info!(
                engine = engine.name(),
                voice = %request.voice,
                bytes = bytes.len(),
                elapsed_ms,
                "Speech generated"
            );
            Ok(bytes)
        }
        (Ok(_), Err(e)) => {
            error!(
                artifact = %request.output_path.display(),
                error = %e,
                "Failed to remove audio artifact"
            );
            Err(SynthesisError::ArtifactIo(e))
        }
        (Err(primary), cleanup) => {
            if let Err(e) = cleanup {
                warn!(
                    artifact = %request.output_path.display(),
                    error = %e,
                    "Failed to remove audio artifact after synthesis error"
                );
            }
            error!(
                engine = engine.name(),
                voice = %request.voice,
                elapsed_ms,
                error = %primary,
                "Speech generation failed"
            );
            Err(primary)
        }
    }
}

/// Log the WAV header; audio bytes are never modified.
fn inspect_wav(bytes: &[u8], voice: &str) {
    match hound::WavReader::new(Cursor::new(bytes)) {
        Ok(reader) => {
            let spec = reader.spec();
            let duration_ms = if spec.sample_rate > 0 {
                u64::from(reader.duration()) * 1000 / u64::from(spec.sample_rate)
            } else {
                0
            };
            debug!(
                voice,
                sample_rate = spec.sample_rate,
                channels = spec.channels,
                bits_per_sample = spec.bits_per_sample,
                duration_ms,
                "Generated WAV"
            );
        }
        Err(e) => warn!(voice, error = %e, "Engine output is not a readable WAV file"),
    }
}
