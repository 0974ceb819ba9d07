//! Public recognition surface
//!
//! Types shaped after the browser speech-recognition API: the recognizer
//! object itself, the named-event vocabulary and dispatcher, result and
//! grammar containers, and the closed error-code enumeration.

mod error;
mod events;
mod grammar;
mod recognition;
mod results;

pub use error::ErrorCode;
pub use events::{EventDispatcher, EventKind, ListenerToken, RecognitionEvent};
pub use grammar::{Grammar, GrammarList};
pub use recognition::SpeechRecognition;
pub use results::{RecognitionAlternative, RecognitionResult, RecognitionResultList};
