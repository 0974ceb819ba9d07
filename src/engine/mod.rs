//! Capture-engine boundary
//!
//! The session controller does not touch audio hardware or the ASR wire
//! protocol. It issues four commands to a `CaptureEngine` and consumes the
//! engine's callbacks as `CaptureEvent`s delivered over a channel. Real
//! engines wrap a microphone pipeline and a streaming ASR client; the
//! `ScriptedEngine` replays a canned sequence for demos and tests.

mod scripted;

pub use scripted::{Script, ScriptedEngine};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Decoded transcript or error payload from the recognition stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecognitionPayload {
    /// An interim or final transcript with its confidence estimate.
    #[serde(rename_all = "camelCase")]
    Result {
        #[serde(default)]
        transcript: String,
        #[serde(default)]
        confidence: f32,
        #[serde(default)]
        is_final: bool,
    },

    /// An error reported by the recognition service.
    Error {
        #[serde(default)]
        name: String,
        #[serde(default)]
        message: String,
    },
}

/// Voice-activity-detection milestones reported by the capture engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VadState {
    VoiceUp,
    VoiceDown,
    SpeechStart,
    SpeechEnd,
}

/// Recognition stream lifecycle reported by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Started,
    /// The stream ended; `buffer_or_time_limit` is set when the server
    /// closed it because a buffer or time limit was reached.
    Ended { buffer_or_time_limit: bool },
}

/// Callbacks from the capture engine, delivered in arrival order over a
/// single channel into the session controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureEvent {
    /// The audio processor finished initializing and can start capturing.
    ProcessorReady {
        input_sample_rate: u32,
        target_sample_rate: u32,
        source_label: Option<String>,
    },

    /// The transport connected to the ASR server. `model` is present once
    /// the server negotiated an active model.
    Connected { model: Option<String> },

    /// The transport disconnected from the ASR server.
    Disconnected,

    /// The audio processor failed to initialize.
    ProcessorInitError { name: String, message: String },

    /// The audio processor failed at runtime.
    ProcessorError { name: String, message: String },

    /// The microphone opened and audio capture began.
    AudioStart,

    /// The microphone closed and audio capture ended.
    AudioEnd,

    /// The audio processor was torn down and its resources released.
    ProcessorReleased,

    /// The recognition stream started or ended.
    StreamStateChange(StreamState),

    /// A transcript or error payload from the recognition stream.
    Recognition(RecognitionPayload),

    /// A voice-activity-detection state change.
    VadStateChange(VadState),
}

/// Engine-specific ASR options, including the phrase and hot-word lists
/// merged in at capture-start time. Unknown engine features pass through
/// in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phrases: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hot_words: Vec<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Merged server settings and ASR options handed to the engine when a
/// capture session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsrOptions {
    pub server_url: String,
    pub client_id: String,
    pub access_token: String,
    pub language: String,
    pub task: String,
    pub model: String,
    pub continuous: bool,
    pub optimize_final_result: bool,
    pub engine_options: EngineOptions,
}

impl Default for AsrOptions {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:20741".to_string(),
            client_id: "any".to_string(),
            access_token: "test1234".to_string(),
            language: "en-US".to_string(),
            task: String::new(),
            model: String::new(),
            continuous: true,
            optimize_final_result: true,
            engine_options: EngineOptions::default(),
        }
    }
}

/// Full configuration for one capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Input gain applied to the microphone signal.
    pub gain: f32,

    /// Whether the engine should run voice-activity detection.
    pub vad: bool,

    pub asr: AsrOptions,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            gain: 1.0,
            vad: true,
            asr: AsrOptions::default(),
        }
    }
}

/// Audio capture and streaming-recognition engine.
///
/// Commands are non-blocking requests; completion and progress arrive as
/// `CaptureEvent`s on the channel the engine was built with.
#[async_trait::async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Acquire and prepare a microphone session bound to the given options.
    /// Readiness is signaled by `CaptureEvent::ProcessorReady`.
    async fn create(&self, config: CaptureConfig) -> Result<()>;

    /// Begin capturing audio.
    async fn start(&self) -> Result<()>;

    /// Stop capturing audio; a final result may still follow.
    async fn stop(&self) -> Result<()>;

    /// Stop and release the capture session if one is active. Completion
    /// is signaled by `CaptureEvent::ProcessorReleased`.
    async fn stop_and_release(&self) -> Result<()>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}
