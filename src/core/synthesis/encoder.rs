use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

/// Media type of every synthesized artifact.
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Synthesized audio ready to be sent to the client.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Bytes,
    pub voice: String,
    pub timestamp: String,
}

impl SpeechAudio {
    pub fn new(bytes: Bytes, voice: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            bytes,
            voice: voice.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Download name, `{voice}_{timestamp}.wav`.
    pub fn filename(&self) -> String {
        format!("{}_{}.wav", self.voice, self.timestamp)
    }
}

impl IntoResponse for SpeechAudio {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename={}", self.filename());
        let content_length = self.bytes.len();

        let mut response = (StatusCode::OK, self.bytes).into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(WAV_CONTENT_TYPE),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
        match HeaderValue::from_str(&disposition) {
            Ok(value) => {
                headers.insert(header::CONTENT_DISPOSITION, value);
            }
            Err(_) => {
                headers.insert(
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static("attachment"),
                );
            }
        }

        response
    }
}
