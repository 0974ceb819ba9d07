use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ErrorCode;
use super::results::RecognitionResultList;

/// The fixed vocabulary of event names a recognizer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    AudioStart,
    SoundStart,
    SpeechStart,
    SpeechEnd,
    SoundEnd,
    AudioEnd,
    Result,
    NoMatch,
    Error,
    Start,
    End,
}

impl EventKind {
    /// Web Speech API event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AudioStart => "audiostart",
            EventKind::SoundStart => "soundstart",
            EventKind::SpeechStart => "speechstart",
            EventKind::SpeechEnd => "speechend",
            EventKind::SoundEnd => "soundend",
            EventKind::AudioEnd => "audioend",
            EventKind::Result => "result",
            EventKind::NoMatch => "nomatch",
            EventKind::Error => "error",
            EventKind::Start => "start",
            EventKind::End => "end",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event delivered to listeners. Lifecycle events carry no payload;
/// `result`/`nomatch` carry the result list for the current dispatch and
/// `error` carries a code from the closed taxonomy.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    AudioStart,
    SoundStart,
    SpeechStart,
    SpeechEnd,
    SoundEnd,
    AudioEnd,
    Result {
        /// Lowest index in `results` that changed (always 0 here).
        result_index: usize,
        results: RecognitionResultList,
    },
    NoMatch {
        result_index: usize,
        results: RecognitionResultList,
    },
    Error {
        error: ErrorCode,
        message: String,
    },
    Start,
    End,
}

impl RecognitionEvent {
    /// Event name this payload is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            RecognitionEvent::AudioStart => EventKind::AudioStart,
            RecognitionEvent::SoundStart => EventKind::SoundStart,
            RecognitionEvent::SpeechStart => EventKind::SpeechStart,
            RecognitionEvent::SpeechEnd => EventKind::SpeechEnd,
            RecognitionEvent::SoundEnd => EventKind::SoundEnd,
            RecognitionEvent::AudioEnd => EventKind::AudioEnd,
            RecognitionEvent::Result { .. } => EventKind::Result,
            RecognitionEvent::NoMatch { .. } => EventKind::NoMatch,
            RecognitionEvent::Error { .. } => EventKind::Error,
            RecognitionEvent::Start => EventKind::Start,
            RecognitionEvent::End => EventKind::End,
        }
    }
}

type Listener = Arc<dyn Fn(&RecognitionEvent) + Send + Sync>;

/// Token returned from `add_listener`, used to remove the listener again.
/// Closures have no identity in Rust, so removal is by token rather than
/// by function reference as in the browser API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerToken {
    kind: EventKind,
    id: u64,
}

#[derive(Default)]
struct DispatcherInner {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<(u64, Listener)>>,
    handlers: HashMap<EventKind, Listener>,
}

/// Fan-out point for recognition events.
///
/// Each event name has zero or more registered listeners plus one singular
/// handler slot (the `onresult`-style property of the mimicked API).
/// Listeners fire in registration order; the handler slot fires last.
#[derive(Default)]
pub struct EventDispatcher {
    inner: Mutex<DispatcherInner>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event name. Returns a token for removal.
    pub fn add_listener(
        &self,
        kind: EventKind,
        listener: impl Fn(&RecognitionEvent) + Send + Sync + 'static,
    ) -> ListenerToken {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = inner.next_id;
        inner.next_id += 1;
        inner
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));
        ListenerToken { kind, id }
    }

    /// Remove a previously registered listener. Returns false if the token
    /// was already removed.
    pub fn remove_listener(&self, token: ListenerToken) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(listeners) = inner.listeners.get_mut(&token.kind) {
            if let Some(pos) = listeners.iter().position(|(id, _)| *id == token.id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Set the singular handler slot for an event name, replacing any
    /// previous handler.
    pub fn set_handler(
        &self,
        kind: EventKind,
        handler: impl Fn(&RecognitionEvent) + Send + Sync + 'static,
    ) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.handlers.insert(kind, Arc::new(handler));
    }

    /// Clear the handler slot for an event name.
    pub fn clear_handler(&self, kind: EventKind) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.handlers.remove(&kind);
    }

    /// Deliver an event: listeners in registration order, then the handler
    /// slot. Callbacks run outside the dispatcher lock so a listener may
    /// register or remove listeners without deadlocking.
    pub fn dispatch(&self, event: &RecognitionEvent) {
        let kind = event.kind();
        let (listeners, handler) = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let listeners: Vec<Listener> = inner
                .listeners
                .get(&kind)
                .map(|l| l.iter().map(|(_, cb)| Arc::clone(cb)).collect())
                .unwrap_or_default();
            let handler = inner.handlers.get(&kind).map(Arc::clone);
            (listeners, handler)
        };

        debug!("dispatching '{}' to {} listener(s)", kind, listeners.len());

        for listener in &listeners {
            listener(event);
        }
        if let Some(handler) = handler {
            handler(event);
        }
    }
}
