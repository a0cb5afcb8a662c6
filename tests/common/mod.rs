//! Shared fixtures for the HTTP integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use tempfile::TempDir;

use orpheus_gateway::config::{DEFAULT_MAX_BODY_BYTES, ServerConfig};
use orpheus_gateway::core::synthesis::{
    EngineConfig, EngineError, EngineKind, EngineRequest, EngineResult, GenerationDefaults,
    SynthesisEngine,
};
use orpheus_gateway::core::voices::{BUILTIN_VOICES, VoiceSpec};
use orpheus_gateway::{AppState, create_app};

/// What the fake engine does when invoked.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Write a short valid WAV file
    Wav,
    /// Fail without touching the output path
    Fail,
    /// Write a truncated file, then fail
    PartialThenFail,
    /// Sleep, then write a WAV file
    SlowWav(Duration),
}

pub struct FakeEngine {
    behavior: Behavior,
    pub seen: Mutex<Vec<EngineRequest>>,
}

impl FakeEngine {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<EngineRequest> {
        self.seen.lock().unwrap().clone()
    }
}

pub fn write_wav(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 24_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..4800i32 {
        writer.write_sample(((i % 200) - 100) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[async_trait]
impl SynthesisEngine for FakeEngine {
    async fn synthesize(&self, request: &EngineRequest) -> EngineResult<()> {
        self.seen.lock().unwrap().push(request.clone());
        match self.behavior {
            Behavior::Wav => {
                write_wav(&request.output_path);
                Ok(())
            }
            Behavior::Fail => Err(EngineError::Failed {
                status: "exit code 1".to_string(),
                detail: "CUDA out of memory".to_string(),
            }),
            Behavior::PartialThenFail => {
                std::fs::write(&request.output_path, b"RIFF\x24\x00\x00\x00WAVE").unwrap();
                Err(EngineError::Failed {
                    status: "exit code 139".to_string(),
                    detail: "segmentation fault".to_string(),
                })
            }
            Behavior::SlowWav(delay) => {
                tokio::time::sleep(delay).await;
                write_wav(&request.output_path);
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn test_config(artifact_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        tls: None,
        cors_allowed_origins: Some("*".to_string()),
        max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        artifact_dir: artifact_dir.to_path_buf(),
        voices: BUILTIN_VOICES.iter().map(|id| VoiceSpec::new(*id)).collect(),
        default_voice: "tara".to_string(),
        generation: GenerationDefaults::default(),
        engine: EngineConfig {
            kind: EngineKind::Command,
            command: Some("orpheus-cli".to_string()),
            ..Default::default()
        },
    }
}

pub struct TestApp {
    pub app: Router,
    pub engine: Arc<FakeEngine>,
    pub artifact_dir: TempDir,
}

impl TestApp {
    pub async fn new(behavior: Behavior) -> Self {
        Self::with_config(behavior, |_| {}).await
    }

    pub async fn with_config(behavior: Behavior, customize: impl FnOnce(&mut ServerConfig)) -> Self {
        let artifact_dir = TempDir::new().unwrap();
        let mut config = test_config(artifact_dir.path());
        customize(&mut config);

        let engine = FakeEngine::new(behavior);
        let state = AppState::with_engine(config, engine.clone()).await.unwrap();

        Self {
            app: create_app(state),
            engine,
            artifact_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_speech(&self, body: serde_json::Value) -> Response<Body> {
        self.send(speech_request(body.to_string())).await
    }

    /// Files left behind in the artifact directory.
    pub fn leftover_artifacts(&self) -> Vec<String> {
        std::fs::read_dir(self.artifact_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub fn speech_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/audio/speech")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
