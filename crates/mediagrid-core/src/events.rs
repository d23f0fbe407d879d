//! Event emission abstraction.
//!
//! Session state changes are pushed to the frontend as named events with a
//! JSON payload. The core only knows the [`EventSink`] trait; the FFI layer
//! plugs in a sink that forwards to a C callback.

use std::sync::Arc;

use serde::Serialize;

use crate::sessions::SessionId;

/// Emitted when a session's accumulated photo list changes.
pub const SESSION_PHOTOS_CHANGED: &str = "session-photos-changed";
/// Emitted when a session starts or finishes a fetch.
pub const SESSION_LOADING_CHANGED: &str = "session-loading-changed";
/// Emitted when a background load fails.
pub const SESSION_ERROR: &str = "session-error";

/// Trait for emitting events to the frontend.
pub trait EventSink: Send + Sync {
    /// Emit an event with the given name and JSON payload.
    fn emit(&self, event_name: &str, payload_json: &str);
}

/// Extension trait for EventSink that provides typed emit functionality.
pub trait EventSinkExt {
    /// Emit an event with a typed payload that will be serialized to JSON.
    fn emit_typed<T: Serialize>(&self, event_name: &str, payload: &T);
}

impl<S: EventSink + ?Sized> EventSinkExt for S {
    fn emit_typed<T: Serialize>(&self, event_name: &str, payload: &T) {
        match serde_json::to_string(payload) {
            Ok(json) => self.emit(event_name, &json),
            Err(e) => {
                tracing::error!("Failed to serialize event payload: {}", e);
            }
        }
    }
}

/// Shared reference to an EventSink implementation.
pub type SharedEventSink = Arc<dyn EventSink>;

/// Event sink that drops everything.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn emit(&self, _event_name: &str, _payload_json: &str) {}
}

/// Event sink that only logs.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn emit(&self, event_name: &str, payload_json: &str) {
        tracing::debug!(event = event_name, payload = payload_json, "Event emitted");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosChangedPayload {
    pub session_id: SessionId,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingChangedPayload {
    pub session_id: SessionId,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionErrorPayload {
    pub session_id: SessionId,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(String, String)>>,
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event_name: &str, payload_json: &str) {
            self.events
                .lock()
                .unwrap()
                .push((event_name.to_string(), payload_json.to_string()));
        }
    }

    #[test]
    fn test_emit_typed_serializes_camel_case() {
        let sink = RecordingSink::default();
        sink.emit_typed(
            SESSION_PHOTOS_CHANGED,
            &PhotosChangedPayload {
                session_id: 3,
                count: 60,
            },
        );

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "session-photos-changed");
        assert_eq!(events[0].1, r#"{"sessionId":3,"count":60}"#);
    }

    #[test]
    fn test_emit_through_shared_sink() {
        let recording = Arc::new(RecordingSink::default());
        let sink: SharedEventSink = recording.clone();
        sink.emit_typed(
            SESSION_LOADING_CHANGED,
            &LoadingChangedPayload {
                session_id: 1,
                loading: true,
            },
        );
        assert_eq!(recording.events.lock().unwrap().len(), 1);
    }
}
