use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::events::{EventDispatcher, EventKind, ListenerToken, RecognitionEvent};
use super::grammar::GrammarList;
use crate::config::Config;
use crate::engine::{CaptureEngine, CaptureEvent};
use crate::session::{MicState, SessionStats, SpeechSession};

/// A speech recognizer shaped after the browser speech-recognition API,
/// backed by a streaming ASR capture engine.
///
/// Construction wires the engine's event channel into the session
/// controller; `start`/`stop`/`abort` are distinct, independently
/// idempotent operations on top of the controller's toggle primitive.
pub struct SpeechRecognition {
    /// Grammars for the recognition service. Read-only while a session is
    /// running; not consulted by the session machine itself.
    pub grammars: GrammarList,

    /// Requested recognition language (BCP 47 tag). Checked against the
    /// negotiated server language when capture starts.
    pub lang: String,

    /// Whether continuous results are requested for each session.
    pub continuous: bool,

    /// Carried for API compatibility; the bridge surfaces every interim
    /// result the backend sends regardless of this flag.
    pub interim_results: bool,

    /// Maximum alternatives per result. The backend currently produces
    /// one alternative per result, so values above 1 have no effect.
    pub max_alternatives: u32,

    dispatcher: Arc<EventDispatcher>,
    session: SpeechSession,
    pump: JoinHandle<()>,
}

impl SpeechRecognition {
    /// Build a recognizer from resolved configuration, a capture engine,
    /// and the channel the engine delivers its callbacks on.
    pub fn new(
        config: &Config,
        engine: Arc<dyn CaptureEngine>,
        events: mpsc::UnboundedReceiver<CaptureEvent>,
    ) -> Self {
        let session_config = config.session_config();
        let lang = session_config.language.clone();
        let continuous = session_config.continuous;

        let dispatcher = Arc::new(EventDispatcher::new());
        let session = SpeechSession::new(session_config, engine, Arc::clone(&dispatcher));
        let pump = session.spawn_pump(events);

        Self {
            grammars: GrammarList::new(),
            lang,
            continuous,
            interim_results: false,
            max_alternatives: 1,
            dispatcher,
            session,
            pump,
        }
    }

    /// Start listening with intent to recognize. No-op unless idle.
    pub async fn start(&self) -> Result<()> {
        self.sync_settings().await;
        self.session.start().await
    }

    /// Stop listening and attempt to return a final result using the audio
    /// captured so far. No-op unless recording.
    pub async fn stop(&self) -> Result<()> {
        self.session.stop().await
    }

    /// Stop listening without attempting to return a result. No-op when
    /// already idle.
    pub async fn abort(&self) -> Result<()> {
        self.session.abort().await
    }

    /// The underlying toggle primitive: start from idle, stop while
    /// recording, release otherwise.
    pub async fn toggle(&self) -> Result<()> {
        self.sync_settings().await;
        self.session.toggle().await
    }

    /// Register a listener for a named event. Listeners fire in
    /// registration order, before the singular handler slot.
    pub fn add_event_listener(
        &self,
        kind: EventKind,
        listener: impl Fn(&RecognitionEvent) + Send + Sync + 'static,
    ) -> ListenerToken {
        self.dispatcher.add_listener(kind, listener)
    }

    /// Remove a previously registered listener by token.
    pub fn remove_event_listener(&self, token: ListenerToken) -> bool {
        self.dispatcher.remove_listener(token)
    }

    /// Set the singular handler slot for a named event (the `onresult`
    /// style property of the mimicked API).
    pub fn set_handler(
        &self,
        kind: EventKind,
        handler: impl Fn(&RecognitionEvent) + Send + Sync + 'static,
    ) {
        self.dispatcher.set_handler(kind, handler);
    }

    /// Clear the handler slot for a named event.
    pub fn clear_handler(&self, kind: EventKind) {
        self.dispatcher.clear_handler(kind);
    }

    /// Current session lifecycle state.
    pub async fn state(&self) -> MicState {
        self.session.state().await
    }

    /// Snapshot of the session counters.
    pub async fn stats(&self) -> SessionStats {
        self.session.stats().await
    }

    /// Push the mutable recognizer settings down into the session before
    /// a capture start.
    async fn sync_settings(&self) {
        self.session.set_language(&self.lang).await;
        self.session.set_continuous(self.continuous).await;
    }
}

impl Drop for SpeechRecognition {
    fn drop(&mut self) {
        debug!("Dropping recognizer, stopping capture event pump");
        self.pump.abort();
    }
}
