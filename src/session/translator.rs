//! Result/Error Translator
//!
//! Converts raw transcript and error payloads from the recognition stream
//! into the public event vocabulary. The error mapping is a closed table:
//! anything outside it is logged and never surfaced.

use crate::api::{
    ErrorCode, RecognitionAlternative, RecognitionEvent, RecognitionResult, RecognitionResultList,
};

/// Public event produced for one transcript payload, plus whether the
/// payload was final. The controller uses `is_final` to decide whether to
/// clear or set the wait for a final result.
#[derive(Debug)]
pub struct TranscriptTranslation {
    pub event: RecognitionEvent,
    pub is_final: bool,
}

/// Build the public event for a transcript payload.
///
/// A final transcript dispatches `result`, or a `no-speech` error when it
/// is empty. An interim transcript dispatches `result`, or `nomatch` when
/// no content has been recognized yet.
pub fn translate_transcript(
    transcript: &str,
    confidence: f32,
    is_final: bool,
) -> TranscriptTranslation {
    if is_final && transcript.is_empty() {
        return TranscriptTranslation {
            event: RecognitionEvent::Error {
                error: ErrorCode::NoSpeech,
                message: "No speech was detected in the final transcript".to_string(),
            },
            is_final,
        };
    }

    let alternative = RecognitionAlternative::new(transcript, confidence);
    let result = RecognitionResult::new(vec![alternative], is_final);
    let results = RecognitionResultList::from(result);

    let event = if transcript.is_empty() {
        // Interim with no content yet.
        RecognitionEvent::NoMatch {
            result_index: 0,
            results,
        }
    } else {
        RecognitionEvent::Result {
            result_index: 0,
            results,
        }
    };

    TranscriptTranslation { event, is_final }
}

/// Map a backend error identifier onto the closed error-code taxonomy.
///
/// Returns `None` for anything outside the table; such errors are logged
/// by the caller and never dispatched publicly.
pub fn map_backend_error(name: &str, message: &str) -> Option<(ErrorCode, String)> {
    let lowered = message.to_ascii_lowercase();

    if name.contains("NotAllowed") || name.contains("PermissionDenied") {
        return Some((
            ErrorCode::NotAllowed,
            format!("Microphone access was denied ({})", message),
        ));
    }

    if name.contains("Connection") || lowered.contains("connection failed") {
        return Some((ErrorCode::Network, message.to_string()));
    }

    // The server sends no distinct "unauthorized" signal; a chunk processor
    // that fails to load is almost always a credentials problem. Only the
    // chunk-processor load failure qualifies; other load failures stay
    // internal. The raw message rides along so the real cause stays
    // recoverable.
    if lowered.contains("failed to load")
        && (lowered.contains("chunkprocessor") || lowered.contains("chunk processor"))
    {
        return Some((
            ErrorCode::ServiceNotAllowed,
            format!(
                "Access to the recognition service was denied, likely due to invalid credentials ({})",
                message
            ),
        ));
    }

    None
}
