use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{CaptureConfig, CaptureEngine, CaptureEvent, RecognitionPayload, VadState};

/// A canned capture session: the events to replay in response to the
/// `start` and `stop` commands. Scripts can be written by hand, built with
/// `Script::utterance`, or loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    /// Model the engine reports on connect. `None` suppresses the `start`
    /// event, as a connection without a negotiated model would.
    pub model: Option<String>,

    /// Events replayed after the `start` command.
    pub on_start: Vec<CaptureEvent>,

    /// Events replayed after the `stop` command.
    pub on_stop: Vec<CaptureEvent>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            model: Some("scripted-en-US".to_string()),
            on_start: Vec::new(),
            on_stop: Vec::new(),
        }
    }
}

impl Script {
    /// A complete single-utterance session: capture opens, speech is
    /// detected, an interim transcript arrives, and stopping yields the
    /// final transcript.
    pub fn utterance(interim: &str, final_transcript: &str, confidence: f32) -> Self {
        Self {
            model: Some("scripted-en-US".to_string()),
            on_start: vec![
                CaptureEvent::AudioStart,
                CaptureEvent::VadStateChange(VadState::VoiceUp),
                CaptureEvent::VadStateChange(VadState::SpeechStart),
                CaptureEvent::Recognition(RecognitionPayload::Result {
                    transcript: interim.to_string(),
                    confidence: 0.0,
                    is_final: false,
                }),
            ],
            on_stop: vec![
                CaptureEvent::VadStateChange(VadState::SpeechEnd),
                CaptureEvent::VadStateChange(VadState::VoiceDown),
                CaptureEvent::AudioEnd,
                CaptureEvent::Recognition(RecognitionPayload::Result {
                    transcript: final_transcript.to_string(),
                    confidence,
                    is_final: true,
                }),
                CaptureEvent::Disconnected,
            ],
        }
    }

    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse capture script")
    }
}

/// Capture engine that replays a `Script` instead of touching hardware.
/// Fills the role a file-based backend plays for audio capture: demos and
/// tests run the full session machine without a microphone or server.
pub struct ScriptedEngine {
    events: mpsc::UnboundedSender<CaptureEvent>,
    script: Script,
    active: AtomicBool,
}

impl ScriptedEngine {
    pub fn new(events: mpsc::UnboundedSender<CaptureEvent>, script: Script) -> Self {
        Self {
            events,
            script,
            active: AtomicBool::new(false),
        }
    }

    fn send(&self, event: CaptureEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow::anyhow!("capture event channel closed"))
    }

    fn replay(&self, events: &[CaptureEvent]) -> Result<()> {
        for event in events {
            self.send(event.clone())?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CaptureEngine for ScriptedEngine {
    async fn create(&self, config: CaptureConfig) -> Result<()> {
        info!(
            "Scripted engine created (language={}, model={})",
            config.asr.language,
            if config.asr.model.is_empty() {
                "<auto>"
            } else {
                &config.asr.model
            }
        );
        self.active.store(true, Ordering::SeqCst);
        self.send(CaptureEvent::ProcessorReady {
            input_sample_rate: 48000,
            target_sample_rate: 16000,
            source_label: Some("scripted".to_string()),
        })
    }

    async fn start(&self) -> Result<()> {
        debug!("Scripted engine start");
        self.send(CaptureEvent::Connected {
            model: self.script.model.clone(),
        })?;
        self.replay(&self.script.on_start)
    }

    async fn stop(&self) -> Result<()> {
        debug!("Scripted engine stop");
        self.replay(&self.script.on_stop)
    }

    async fn stop_and_release(&self) -> Result<()> {
        if self.active.swap(false, Ordering::SeqCst) {
            debug!("Scripted engine releasing active session");
            self.send(CaptureEvent::ProcessorReleased)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
