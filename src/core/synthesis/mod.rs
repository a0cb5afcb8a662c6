//! Speech synthesis request pipeline.
//!
//! A request flows through four stages:
//!
//! 1. [`validator`] - checks the request and resolves defaults into a [`SynthesisJob`]
//! 2. [`engine`] - the external engine writes WAV audio to the job's artifact path
//! 3. [`artifact`] - the artifact is read back and always deleted
//! 4. [`encoder`] - the audio becomes an `audio/wav` attachment response
//!
//! [`pipeline::SpeechPipeline`] ties stages 2 and 3 together.

pub mod artifact;
pub mod encoder;
pub mod engine;
pub mod pipeline;
pub mod request;
pub mod validator;

pub use artifact::{Artifact, ArtifactPath, generation_timestamp};
pub use encoder::{SpeechAudio, WAV_CONTENT_TYPE};
pub use engine::{
    CommandEngine, EngineConfig, EngineError, EngineKind, EngineRequest, EngineResult,
    HttpEngine, SynthesisEngine, create_engine,
};
pub use pipeline::{SpeechPipeline, SynthesisError};
pub use request::{
    DEFAULT_MODEL, DEFAULT_REPETITION_PENALTY, DEFAULT_SPEED, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
    GenerationDefaults, GenerationParams, SUPPORTED_RESPONSE_FORMAT, SynthesisJob,
    SynthesisRequest,
};
pub use validator::{RequestValidator, ValidationError};
