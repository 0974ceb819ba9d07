//! Recognition session management
//!
//! This module provides the session state machine that bridges the
//! capture-engine callbacks to the public event vocabulary:
//! - Microphone lifecycle (idle / loading / recording / awaiting-final-result)
//! - Interim vs. final transcript reconciliation
//! - Fallback timeout when a final result never arrives
//! - Backend error translation into the closed error-code taxonomy

mod config;
mod session;
mod stats;
pub mod translator;

pub use config::SessionConfig;
pub use session::{language_matches, MicState, SpeechSession};
pub use stats::SessionStats;
