// Unit tests for the result/error translator tables.

use asr_bridge::session::translator::{map_backend_error, translate_transcript};
use asr_bridge::{ErrorCode, RecognitionEvent};

#[test]
fn test_final_transcript_becomes_result() {
    let t = translate_transcript("hello world", 0.93, true);
    assert!(t.is_final);
    match t.event {
        RecognitionEvent::Result { result_index, results } => {
            assert_eq!(result_index, 0);
            assert_eq!(results.len(), 1);
            let result = results.get(0).unwrap();
            assert!(result.is_final);
            let best = result.best().unwrap();
            assert_eq!(best.transcript, "hello world");
            assert!((best.confidence - 0.93).abs() < 1e-6);
        }
        other => panic!("expected result event, got {:?}", other),
    }
}

#[test]
fn test_interim_transcript_becomes_interim_result() {
    let t = translate_transcript("hel", 0.0, false);
    assert!(!t.is_final);
    match t.event {
        RecognitionEvent::Result { results, .. } => {
            assert!(!results.get(0).unwrap().is_final);
        }
        other => panic!("expected interim result event, got {:?}", other),
    }
}

#[test]
fn test_empty_final_transcript_becomes_no_speech_error() {
    let t = translate_transcript("", 0.0, true);
    assert!(t.is_final);
    match t.event {
        RecognitionEvent::Error { error, .. } => assert_eq!(error, ErrorCode::NoSpeech),
        other => panic!("expected no-speech error, got {:?}", other),
    }
}

#[test]
fn test_empty_interim_transcript_becomes_nomatch() {
    let t = translate_transcript("", 0.0, false);
    assert!(!t.is_final);
    match t.event {
        RecognitionEvent::NoMatch { results, .. } => {
            assert_eq!(results.len(), 1);
        }
        other => panic!("expected nomatch event, got {:?}", other),
    }
}

#[test]
fn test_confidence_is_clamped() {
    let t = translate_transcript("loud", 3.5, true);
    match t.event {
        RecognitionEvent::Result { results, .. } => {
            let best = results.get(0).unwrap().best().unwrap().confidence;
            assert!((best - 1.0).abs() < 1e-6, "confidence clamped to 1.0, got {}", best);
        }
        other => panic!("expected result event, got {:?}", other),
    }
}

#[test]
fn test_connection_failure_maps_to_network() {
    let (code, message) =
        map_backend_error("SocketConnectionError", "could not reach server").unwrap();
    assert_eq!(code, ErrorCode::Network);
    assert_eq!(message, "could not reach server");
}

#[test]
fn test_chunk_load_failure_maps_to_service_not_allowed() {
    let (code, message) =
        map_backend_error("Error", "ChunkProcessorError failed to load.").unwrap();
    assert_eq!(code, ErrorCode::ServiceNotAllowed);
    assert!(message.contains("invalid credentials"), "overridden message: {}", message);
    assert!(
        message.contains("ChunkProcessorError failed to load."),
        "raw message preserved: {}",
        message
    );
}

#[test]
fn test_permission_denial_maps_to_not_allowed() {
    let (code, _) = map_backend_error("NotAllowedError", "Permission denied").unwrap();
    assert_eq!(code, ErrorCode::NotAllowed);

    let (code, _) = map_backend_error("PermissionDeniedError", "no mic for you").unwrap();
    assert_eq!(code, ErrorCode::NotAllowed);
}

#[test]
fn test_unknown_errors_are_not_mapped() {
    assert!(map_backend_error("Error", "something odd happened").is_none());
    assert!(map_backend_error("TimeoutError", "decode took too long").is_none());
}

#[test]
fn test_unrelated_load_failure_is_not_mapped() {
    // "failed to load" alone is not enough; only the chunk-processor load
    // failure carries the credential heuristic.
    assert!(map_backend_error("Error", "Grammar file failed to load").is_none());
    assert!(map_backend_error("Error", "Worklet module failed to load").is_none());
}
