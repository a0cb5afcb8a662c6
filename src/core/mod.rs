pub mod capabilities;
pub mod synthesis;
pub mod voices;

// Re-export commonly used types for convenience
pub use capabilities::{CapabilitiesResponse, Capability, CapabilityReport, EMOTION_TAGS};

pub use synthesis::{
    EngineConfig, EngineError, EngineKind, GenerationDefaults, RequestValidator, SpeechAudio,
    SpeechPipeline, SynthesisEngine, SynthesisError, SynthesisJob, SynthesisRequest,
    ValidationError, create_engine,
};

pub use voices::{RegistryError, Voice, VoiceRegistry, VoiceSpec};
