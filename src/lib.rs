pub mod api;
pub mod config;
pub mod engine;
pub mod session;

pub use api::{
    ErrorCode, EventDispatcher, EventKind, Grammar, GrammarList, ListenerToken,
    RecognitionAlternative, RecognitionEvent, RecognitionResult, RecognitionResultList,
    SpeechRecognition,
};
pub use config::Config;
pub use engine::{
    AsrOptions, CaptureConfig, CaptureEngine, CaptureEvent, EngineOptions, RecognitionPayload,
    Script, ScriptedEngine, StreamState, VadState,
};
pub use session::{MicState, SessionConfig, SessionStats, SpeechSession};
