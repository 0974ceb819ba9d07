// Tests for the event dispatcher: listener ordering, the singular handler
// slot, and token-based removal.

use std::sync::{Arc, Mutex};

use asr_bridge::{EventDispatcher, EventKind, RecognitionEvent};

fn recording_listener(
    log: &Arc<Mutex<Vec<&'static str>>>,
    tag: &'static str,
) -> impl Fn(&RecognitionEvent) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |_event| log.lock().unwrap().push(tag)
}

#[test]
fn test_listeners_fire_in_registration_order() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    dispatcher.add_listener(EventKind::Start, recording_listener(&log, "first"));
    dispatcher.add_listener(EventKind::Start, recording_listener(&log, "second"));
    dispatcher.add_listener(EventKind::Start, recording_listener(&log, "third"));

    dispatcher.dispatch(&RecognitionEvent::Start);

    assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn test_handler_slot_fires_after_listeners() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    dispatcher.set_handler(EventKind::End, recording_listener(&log, "handler"));
    dispatcher.add_listener(EventKind::End, recording_listener(&log, "listener"));

    dispatcher.dispatch(&RecognitionEvent::End);

    assert_eq!(*log.lock().unwrap(), vec!["listener", "handler"]);
}

#[test]
fn test_handler_slot_is_replaced_not_stacked() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    dispatcher.set_handler(EventKind::End, recording_listener(&log, "old"));
    dispatcher.set_handler(EventKind::End, recording_listener(&log, "new"));

    dispatcher.dispatch(&RecognitionEvent::End);

    assert_eq!(*log.lock().unwrap(), vec!["new"]);
}

#[test]
fn test_events_route_by_kind() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    dispatcher.add_listener(EventKind::Start, recording_listener(&log, "start"));
    dispatcher.add_listener(EventKind::End, recording_listener(&log, "end"));

    dispatcher.dispatch(&RecognitionEvent::End);

    assert_eq!(*log.lock().unwrap(), vec!["end"]);
}

#[test]
fn test_remove_listener_by_token() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let keep = dispatcher.add_listener(EventKind::Start, recording_listener(&log, "keep"));
    let drop_me = dispatcher.add_listener(EventKind::Start, recording_listener(&log, "drop"));

    assert!(dispatcher.remove_listener(drop_me));
    assert!(!dispatcher.remove_listener(drop_me), "second removal reports false");

    dispatcher.dispatch(&RecognitionEvent::Start);
    assert_eq!(*log.lock().unwrap(), vec!["keep"]);

    assert!(dispatcher.remove_listener(keep));
}

#[test]
fn test_clear_handler() {
    let dispatcher = EventDispatcher::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    dispatcher.set_handler(EventKind::Error, recording_listener(&log, "handler"));
    dispatcher.clear_handler(EventKind::Error);

    dispatcher.dispatch(&RecognitionEvent::Error {
        error: asr_bridge::ErrorCode::Network,
        message: "gone".to_string(),
    });

    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_listener_may_register_another_listener() {
    // Dispatch must not hold the dispatcher lock while running callbacks.
    let dispatcher = Arc::new(EventDispatcher::new());
    let log = Arc::new(Mutex::new(Vec::new()));

    let inner_dispatcher = Arc::clone(&dispatcher);
    let inner_log = Arc::clone(&log);
    dispatcher.add_listener(EventKind::Start, move |_event| {
        inner_dispatcher.add_listener(EventKind::Start, recording_listener(&inner_log, "late"));
        inner_log.lock().unwrap().push("outer");
    });

    dispatcher.dispatch(&RecognitionEvent::Start);
    assert_eq!(*log.lock().unwrap(), vec!["outer"]);

    dispatcher.dispatch(&RecognitionEvent::Start);
    assert_eq!(*log.lock().unwrap(), vec!["outer", "outer", "late"]);
}
