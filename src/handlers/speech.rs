use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use tracing::info;

use crate::core::synthesis::{SpeechAudio, SynthesisRequest};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Generate speech for the request body and return it as a WAV attachment.
///
/// The body is validated before any engine work starts. The audio file the
/// engine writes is always removed before this handler returns.
#[cfg_attr(
    feature = "openapi",
    utoipa::path(
        post,
        path = "/v1/audio/speech",
        request_body = SynthesisRequest,
        responses(
            (status = 200, description = "Generated speech as a WAV attachment", body = Vec<u8>, content_type = "audio/wav"),
            (status = 400, description = "Invalid input, unknown voice or unsupported format", body = crate::errors::ErrorBody),
            (status = 422, description = "Malformed request body", body = crate::errors::ErrorBody),
            (status = 500, description = "Speech generation failed", body = crate::errors::ErrorBody)
        ),
        tag = "speech"
    )
)]
pub async fn create_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SynthesisRequest>, JsonRejection>,
) -> AppResult<SpeechAudio> {
    let Json(request) = payload.map_err(AppError::from)?;

    let job = state.validator.validate(&state.registry, request)?;

    info!(
        voice = %job.voice,
        model = %job.model,
        chars = job.input.chars().count(),
        artifact = %job.artifact.as_path().display(),
        "Generating speech"
    );

    let audio = state.pipeline.synthesize(job).await?;
    Ok(audio)
}
