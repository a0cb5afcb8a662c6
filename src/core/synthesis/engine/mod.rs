//! Synthesis engine seam.
//!
//! The model itself runs outside this crate. An engine receives the prompt,
//! voice, sampling controls and an output path, and either leaves a complete
//! WAV file at that path or returns an error. Two bridges are provided:
//!
//! - `command` - runs a local program once per request
//! - `http` - posts the request to a synthesis worker and stores the reply

mod command;
mod worker;

pub use command::{CommandEngine, DEFAULT_COMMAND_ARGS};
pub use worker::HttpEngine;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use zeroize::Zeroizing;

use super::request::GenerationParams;

/// Result type for engine invocations
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to start synthesis program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Synthesis engine failed ({status}): {detail}")]
    Failed { status: String, detail: String },

    #[error("Synthesis engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("Synthesis worker request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Synthesis engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid engine configuration: {0}")]
    InvalidConfiguration(String),
}

/// One generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    pub prompt: String,
    pub voice: String,
    pub output_path: PathBuf,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl EngineRequest {
    pub fn new(
        prompt: impl Into<String>,
        voice: impl Into<String>,
        output_path: impl Into<PathBuf>,
        params: GenerationParams,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            voice: voice.into(),
            output_path: output_path.into(),
            temperature: params.temperature,
            top_p: params.top_p,
            repetition_penalty: params.repetition_penalty,
        }
    }
}

/// External text-to-speech engine.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Generate audio for `request` into `request.output_path`.
    async fn synthesize(&self, request: &EngineRequest) -> EngineResult<()>;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;
}

/// Engine bridge selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    #[default]
    Command,
    Http,
}

impl EngineKind {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "command" | "cmd" | "process" => Ok(Self::Command),
            "http" | "https" | "worker" => Ok(Self::Http),
            other => Err(format!(
                "Unsupported engine kind: {other}. Supported kinds: command, http"
            )),
        }
    }
}

/// Engine settings as loaded from configuration.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub kind: EngineKind,
    /// Program to run (`command` engine)
    pub command: Option<String>,
    /// Argument template (`command` engine); [`DEFAULT_COMMAND_ARGS`] when empty
    pub args: Vec<String>,
    /// Worker endpoint (`http` engine)
    pub url: Option<String>,
    /// Bearer token sent to the worker (`http` engine)
    pub api_key: Option<Zeroizing<String>>,
    /// Per-invocation limit; unlimited when unset
    pub timeout_seconds: Option<u64>,
}

impl EngineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("kind", &self.kind)
            .field("command", &self.command)
            .field("args", &self.args)
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Build the engine described by `config`.
pub fn create_engine(config: &EngineConfig) -> EngineResult<Arc<dyn SynthesisEngine>> {
    match config.kind {
        EngineKind::Command => Ok(Arc::new(CommandEngine::new(config)?)),
        EngineKind::Http => Ok(Arc::new(HttpEngine::new(config)?)),
    }
}
