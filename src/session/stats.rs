use chrono::{DateTime, Utc};
use serde::Serialize;

use super::session::MicState;

/// Counters describing what a session has done so far. Snapshot taken
/// under the session lock, so the numbers are mutually consistent.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Session identifier.
    pub session_id: String,

    /// When the session object was created.
    pub started_at: DateTime<Utc>,

    /// Current lifecycle state.
    pub state: MicState,

    /// Public events dispatched to listeners.
    pub events_emitted: usize,

    /// Transcript payloads dropped because the session was inactive.
    pub results_dropped: usize,

    /// How many times the fallback timer was armed.
    pub fallback_timers_armed: usize,

    /// How many times a pending fallback timer was cancelled.
    pub fallback_timers_cancelled: usize,

    /// How many times the fallback timer expired and cleared the wait for
    /// a final result.
    pub fallback_timers_expired: usize,
}
