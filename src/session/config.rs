use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{AsrOptions, CaptureConfig};

/// Resolved configuration for one recognition session.
///
/// `negotiated_language` is fixed when the server settings are resolved;
/// `language` is what the client asked for and may change between
/// sessions through the recognition surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier.
    pub session_id: String,

    /// Language requested by the client (BCP 47 tag, e.g. "en-US").
    pub language: String,

    /// Language the ASR server negotiated at configuration time.
    pub negotiated_language: String,

    /// Whether continuous results are requested for the session.
    pub continuous: bool,

    /// Input gain applied to the microphone signal.
    pub gain: f32,

    /// How long to wait for a final result after audio capture ends
    /// before silently giving up on it.
    pub fallback_delay: Duration,

    /// Merged server settings and ASR options.
    pub asr: AsrOptions,

    /// Phrase list merged into the engine options at capture-start time.
    pub phrases: Vec<String>,

    /// Hot-word list merged into the engine options at capture-start time.
    pub hot_words: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let asr = AsrOptions::default();
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            language: asr.language.clone(),
            negotiated_language: asr.language.clone(),
            continuous: asr.continuous,
            gain: 1.0,
            fallback_delay: Duration::from_millis(4000),
            asr,
            phrases: Vec::new(),
            hot_words: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Build the engine capture configuration, attaching the phrase and
    /// hot-word lists under the engine-options sub-structure.
    pub fn capture_config(&self) -> CaptureConfig {
        let mut asr = self.asr.clone();
        asr.continuous = self.continuous;
        if !self.phrases.is_empty() {
            asr.engine_options.phrases = self.phrases.clone();
        }
        if !self.hot_words.is_empty() {
            asr.engine_options.hot_words = self.hot_words.clone();
        }
        CaptureConfig {
            gain: self.gain,
            vad: true,
            asr,
        }
    }
}
