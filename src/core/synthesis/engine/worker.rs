use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use super::{EngineConfig, EngineError, EngineRequest, EngineResult, SynthesisEngine};

/// Body posted to the synthesis worker
#[derive(Debug, Serialize)]
struct WorkerRequest<'a> {
    prompt: &'a str,
    voice: &'a str,
    temperature: f64,
    top_p: f64,
    repetition_penalty: f64,
}

/// Delegates generation to a remote worker over HTTP.
///
/// The worker answers with the WAV bytes; they are written verbatim to the
/// requested output path.
#[derive(Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl HttpEngine {
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let raw = config.url.as_deref().ok_or_else(|| {
            EngineError::InvalidConfiguration(
                "http engine requires a worker URL (ENGINE_URL or engine.url)".to_string(),
            )
        })?;

        let url = Url::parse(raw).map_err(|e| {
            EngineError::InvalidConfiguration(format!("invalid worker URL '{raw}': {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EngineError::InvalidConfiguration(format!(
                "worker URL must use http or https, got: {}",
                url.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SynthesisEngine for HttpEngine {
    async fn synthesize(&self, request: &EngineRequest) -> EngineResult<()> {
        let body = WorkerRequest {
            prompt: &request.prompt,
            voice: &request.voice,
            temperature: request.temperature,
            top_p: request.top_p,
            repetition_penalty: request.repetition_penalty,
        };

        let start = Instant::now();
        let mut http_request = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::ACCEPT, "audio/wav")
            .json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key.as_str());
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(url = %self.url, "Synthesis worker timed out");
            }
            EngineError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = if detail.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                detail.trim().to_string()
            };
            warn!(url = %self.url, status = status.as_u16(), "Synthesis worker returned an error");
            return Err(EngineError::Failed {
                status: format!("HTTP {}", status.as_u16()),
                detail,
            });
        }

        let audio = response.bytes().await?;
        tokio::fs::write(&request.output_path, &audio).await?;

        debug!(
            voice = %request.voice,
            bytes = audio.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Synthesis worker responded"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
