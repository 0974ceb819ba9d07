use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::stats::SessionStats;
use super::translator;
use crate::api::{ErrorCode, EventDispatcher, RecognitionEvent};
use crate::engine::{CaptureEngine, CaptureEvent, RecognitionPayload, StreamState, VadState};

/// Lifecycle state of the microphone session, derived from the controller
/// flags. `Idle` is both the initial and the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MicState {
    Idle,
    Loading,
    Recording,
    AwaitingFinalResult,
}

struct Inner {
    config: SessionConfig,
    created_at: DateTime<Utc>,

    // Lifecycle flags; all false is the rest (idle) state. Recording and
    // awaiting-final-result can overlap while interim results stream in.
    loading: bool,
    recording: bool,
    awaiting_final_result: bool,
    asr_streaming: bool,

    source_info: Option<String>,

    // At most one fallback timer is pending; the generation counter makes
    // an already-aborted timer's expiry a no-op.
    fallback_timer: Option<JoinHandle<()>>,
    fallback_generation: u64,

    events_emitted: usize,
    results_dropped: usize,
    fallback_timers_armed: usize,
    fallback_timers_cancelled: usize,
    fallback_timers_expired: usize,
}

impl Inner {
    fn state(&self) -> MicState {
        if self.recording {
            MicState::Recording
        } else if self.loading {
            MicState::Loading
        } else if self.awaiting_final_result {
            MicState::AwaitingFinalResult
        } else {
            MicState::Idle
        }
    }

    fn is_idle(&self) -> bool {
        !self.loading && !self.recording && !self.awaiting_final_result
    }
}

/// The session controller: bridges capture-engine callbacks to the public
/// event vocabulary and owns the microphone lifecycle.
///
/// All callbacks funnel through one mutex-guarded state, so each runs to
/// completion before the next: the single-writer inbox the event ordering
/// guarantee relies on.
#[derive(Clone)]
pub struct SpeechSession {
    inner: Arc<Mutex<Inner>>,
    dispatcher: Arc<EventDispatcher>,
    engine: Arc<dyn CaptureEngine>,
}

impl SpeechSession {
    pub fn new(
        config: SessionConfig,
        engine: Arc<dyn CaptureEngine>,
        dispatcher: Arc<EventDispatcher>,
    ) -> Self {
        info!(
            "Creating speech session {} (negotiated language: {}, engine: {})",
            config.session_id,
            config.negotiated_language,
            engine.name()
        );
        Self {
            inner: Arc::new(Mutex::new(Inner {
                config,
                created_at: Utc::now(),
                loading: false,
                recording: false,
                awaiting_final_result: false,
                asr_streaming: false,
                source_info: None,
                fallback_timer: None,
                fallback_generation: 0,
                events_emitted: 0,
                results_dropped: 0,
                fallback_timers_armed: 0,
                fallback_timers_cancelled: 0,
                fallback_timers_expired: 0,
            })),
            dispatcher,
            engine,
        }
    }

    /// Spawn the pump task that feeds capture events into the controller
    /// in strict arrival order.
    pub fn spawn_pump(&self, mut events: mpsc::UnboundedReceiver<CaptureEvent>) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                session.handle_capture_event(event).await;
            }
            debug!("Capture event channel closed");
        })
    }

    /// Toggle the microphone: start a capture session from idle, stop a
    /// running one, or release a loading/awaiting one.
    pub async fn toggle(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.toggle_locked(&mut inner).await
    }

    /// Start listening. No-op unless the session is idle.
    pub async fn start(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.is_idle() {
            self.toggle_locked(&mut inner).await
        } else {
            debug!("start ignored: session is {:?}", inner.state());
            Ok(())
        }
    }

    /// Stop listening and wait for a final result. No-op unless recording.
    pub async fn stop(&self) -> Result<()> {
        let inner = self.inner.lock().await;
        if inner.recording {
            self.engine
                .stop()
                .await
                .context("Failed to stop capture engine")
        } else {
            debug!("stop ignored: session is {:?}", inner.state());
            Ok(())
        }
    }

    /// Abort: release the capture engine without waiting for a result.
    /// Idempotent no-op when already idle.
    pub async fn abort(&self) -> Result<()> {
        let inner = self.inner.lock().await;
        if inner.is_idle() {
            debug!("abort ignored: session already idle");
            Ok(())
        } else {
            info!("Aborting session {}", inner.config.session_id);
            self.engine
                .stop_and_release()
                .await
                .context("Failed to release capture engine")
        }
    }

    /// Update the requested language for subsequent capture starts.
    pub async fn set_language(&self, language: &str) {
        let mut inner = self.inner.lock().await;
        inner.config.language = language.to_string();
    }

    /// Update the continuous-results flag for subsequent capture starts.
    pub async fn set_continuous(&self, continuous: bool) {
        let mut inner = self.inner.lock().await;
        inner.config.continuous = continuous;
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> MicState {
        self.inner.lock().await.state()
    }

    /// Snapshot of the session counters.
    pub async fn stats(&self) -> SessionStats {
        let inner = self.inner.lock().await;
        SessionStats {
            session_id: inner.config.session_id.clone(),
            started_at: inner.created_at,
            state: inner.state(),
            events_emitted: inner.events_emitted,
            results_dropped: inner.results_dropped,
            fallback_timers_armed: inner.fallback_timers_armed,
            fallback_timers_cancelled: inner.fallback_timers_cancelled,
            fallback_timers_expired: inner.fallback_timers_expired,
        }
    }

    async fn toggle_locked(&self, inner: &mut Inner) -> Result<()> {
        // Language gate: a mismatch never reaches the backend.
        if !language_matches(&inner.config.language, &inner.config.negotiated_language) {
            warn!(
                "Requested language '{}' does not match negotiated language '{}'",
                inner.config.language, inner.config.negotiated_language
            );
            self.emit(
                inner,
                RecognitionEvent::Error {
                    error: ErrorCode::LanguageNotSupported,
                    message: format!(
                        "No model is available for language '{}' (server language: '{}')",
                        inner.config.language, inner.config.negotiated_language
                    ),
                },
            );
            return Ok(());
        }

        if inner.is_idle() {
            inner.loading = true;
            info!("Acquiring microphone for session {}", inner.config.session_id);
            let capture_config = inner.config.capture_config();
            let created = async {
                self.engine
                    .stop_and_release()
                    .await
                    .context("Failed to release previous capture session")?;
                self.engine
                    .create(capture_config)
                    .await
                    .context("Failed to create capture session")
            }
            .await;
            if let Err(e) = created {
                error!("Capture session setup failed: {:#}", e);
                self.reset_to_idle(inner);
                return Err(e);
            }
            Ok(())
        } else if inner.recording {
            // State stays `recording` until the audio-end callback fires.
            info!("Stopping capture for session {}", inner.config.session_id);
            self.engine
                .stop()
                .await
                .context("Failed to stop capture engine")
        } else {
            // Loading or awaiting a final result: hard abort. Flags are
            // forced to rest when the release callback arrives.
            info!("Releasing capture for session {}", inner.config.session_id);
            self.engine
                .stop_and_release()
                .await
                .context("Failed to release capture engine")
        }
    }

    /// Process one capture-engine callback. Callbacks run to completion in
    /// arrival order; transcript payloads for an inactive session are
    /// dropped rather than replayed to listeners.
    pub async fn handle_capture_event(&self, event: CaptureEvent) {
        let mut inner = self.inner.lock().await;
        match event {
            CaptureEvent::ProcessorReady {
                input_sample_rate,
                target_sample_rate,
                source_label,
            } => {
                let info = format!(
                    "{} Hz -> {} Hz ({})",
                    input_sample_rate,
                    target_sample_rate,
                    source_label.as_deref().unwrap_or("unknown device")
                );
                debug!("Processor ready: {}", info);
                inner.source_info = Some(info);
                inner.loading = false;
                inner.recording = false;
                inner.awaiting_final_result = false;
                if let Err(e) = self.engine.start().await {
                    error!("Failed to start capture after processor ready: {:#}", e);
                    self.reset_to_idle(&mut inner);
                }
            }

            CaptureEvent::Connected { model } => {
                if let Some(model) = model {
                    info!("Connected, active ASR model: {}", model);
                    self.emit(&mut inner, RecognitionEvent::Start);
                }
            }

            CaptureEvent::Disconnected => {
                self.emit(&mut inner, RecognitionEvent::End);
            }

            CaptureEvent::AudioStart => {
                self.emit(&mut inner, RecognitionEvent::AudioStart);
                inner.recording = true;
            }

            CaptureEvent::AudioEnd => {
                self.emit(&mut inner, RecognitionEvent::AudioEnd);
                inner.recording = false;
                if inner.awaiting_final_result {
                    self.arm_fallback_timer(&mut inner);
                }
                debug!("Microphone is closed");
            }

            CaptureEvent::ProcessorInitError { name, message } => {
                error!("Processor init error: {}: {}", name, message);
                self.dispatch_backend_error(&mut inner, &name, &message);
                self.reset_to_idle(&mut inner);
            }

            CaptureEvent::ProcessorError { name, message } => {
                error!("Processor error: {}: {}", name, message);
                self.dispatch_backend_error(&mut inner, &name, &message);
                self.reset_to_idle(&mut inner);
            }

            CaptureEvent::ProcessorReleased => {
                debug!("Processor released");
                self.reset_to_idle(&mut inner);
            }

            CaptureEvent::StreamStateChange(StreamState::Started) => {
                inner.asr_streaming = true;
            }

            CaptureEvent::StreamStateChange(StreamState::Ended {
                buffer_or_time_limit,
            }) => {
                if inner.asr_streaming {
                    if buffer_or_time_limit {
                        info!("Recognition stream stopped due to buffer or time limit");
                    }
                    if inner.recording {
                        if let Err(e) = self.engine.stop().await {
                            error!("Failed to stop capture after stream end: {:#}", e);
                        }
                    } else if inner.awaiting_final_result {
                        self.arm_fallback_timer(&mut inner);
                    }
                }
                inner.asr_streaming = false;
            }

            CaptureEvent::VadStateChange(state) => {
                let event = match state {
                    VadState::VoiceUp => RecognitionEvent::SoundStart,
                    VadState::VoiceDown => RecognitionEvent::SoundEnd,
                    VadState::SpeechStart => RecognitionEvent::SpeechStart,
                    VadState::SpeechEnd => RecognitionEvent::SpeechEnd,
                };
                self.emit(&mut inner, event);
            }

            CaptureEvent::Recognition(payload) => {
                self.handle_recognition(&mut inner, payload);
            }
        }
    }

    fn handle_recognition(&self, inner: &mut Inner, payload: RecognitionPayload) {
        match payload {
            RecognitionPayload::Result {
                transcript,
                confidence,
                is_final,
            } => {
                if !inner.recording && !inner.awaiting_final_result {
                    // Stale result from a torn-down session.
                    inner.results_dropped += 1;
                    debug!("Dropping transcript for inactive session: '{}'", transcript);
                    return;
                }
                let translation = translator::translate_transcript(&transcript, confidence, is_final);
                if translation.is_final {
                    self.cancel_fallback_timer(inner);
                    inner.awaiting_final_result = false;
                } else {
                    inner.awaiting_final_result = true;
                }
                self.emit(inner, translation.event);
            }

            RecognitionPayload::Error { name, message } => {
                self.dispatch_backend_error(inner, &name, &message);
            }
        }
    }

    /// Map a backend error onto the public taxonomy. Mapped errors are
    /// dispatched and return the session to idle; everything else is only
    /// logged.
    fn dispatch_backend_error(&self, inner: &mut Inner, name: &str, message: &str) {
        match translator::map_backend_error(name, message) {
            Some((error, message)) => {
                self.emit(inner, RecognitionEvent::Error { error, message });
                self.reset_to_idle(inner);
            }
            None => {
                warn!("Unmapped recognition error (not surfaced): {}: {}", name, message);
            }
        }
    }

    /// Arm the fallback timer, cancelling any pending one first so at most
    /// one is outstanding. Expiry silently clears the wait for a final
    /// result; no event fires.
    fn arm_fallback_timer(&self, inner: &mut Inner) {
        if let Some(timer) = inner.fallback_timer.take() {
            timer.abort();
            inner.fallback_timers_cancelled += 1;
        }
        inner.fallback_generation += 1;
        inner.fallback_timers_armed += 1;

        let generation = inner.fallback_generation;
        let delay = inner.config.fallback_delay;
        let session = self.clone();
        debug!(
            "Arming fallback timer ({} ms, generation {})",
            delay.as_millis(),
            generation
        );
        inner.fallback_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = session.inner.lock().await;
            if inner.fallback_generation == generation && inner.awaiting_final_result {
                warn!("No final result within {} ms, giving up on it", delay.as_millis());
                inner.awaiting_final_result = false;
                inner.fallback_timers_expired += 1;
                inner.fallback_timer = None;
            }
        }));
    }

    /// Cancel a pending fallback timer. Synchronous, no observable side
    /// effect beyond the counter.
    fn cancel_fallback_timer(&self, inner: &mut Inner) {
        if let Some(timer) = inner.fallback_timer.take() {
            timer.abort();
            inner.fallback_generation += 1;
            inner.fallback_timers_cancelled += 1;
        }
    }

    /// Return every lifecycle flag to its rest value.
    fn reset_to_idle(&self, inner: &mut Inner) {
        inner.loading = false;
        inner.recording = false;
        inner.awaiting_final_result = false;
        self.cancel_fallback_timer(inner);
    }

    fn emit(&self, inner: &mut Inner, event: RecognitionEvent) {
        inner.events_emitted += 1;
        self.dispatcher.dispatch(&event);
    }
}

/// Whether the requested language is served by the negotiated one: an
/// exact tag match, or a shared primary subtag ("en" matches "en-US").
pub fn language_matches(requested: &str, negotiated: &str) -> bool {
    if requested.eq_ignore_ascii_case(negotiated) {
        return true;
    }
    primary_subtag(requested).eq_ignore_ascii_case(primary_subtag(negotiated))
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
