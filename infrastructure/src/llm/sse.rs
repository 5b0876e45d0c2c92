//! Chat completion events on top of `eventsource-stream` framing.
//!
//! The crate handles line splitting across network chunks; this module only
//! maps each event's `data` payload to a completion event.

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::fmt::Display;

/// One decoded event from the completion stream
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// Text fragment from `choices[0].delta.content`
    Delta(String),
    /// `data: [DONE]`
    Done,
    /// Server reported an error inside the stream
    Error(String),
}

/// Map one event payload. Role-only deltas and non-JSON payloads yield nothing.
pub fn decode_data(data: &str) -> Option<SseEvent> {
    let data = data.trim();
    if data == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let json: Value = serde_json::from_str(data).ok()?;
    if let Some(message) = json["error"]["message"].as_str() {
        return Some(SseEvent::Error(message.to_string()));
    }
    json["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .map(|content| SseEvent::Delta(content.to_string()))
}

/// Turn a raw response byte stream into completion events.
///
/// A transport or framing failure surfaces as `Err` with its message.
pub fn completion_events<S, B, E>(bytes: S) -> impl Stream<Item = Result<SseEvent, String>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    bytes.eventsource().filter_map(|item| async move {
        match item {
            Ok(event) => decode_data(&event.data).map(Ok),
            Err(e) => Some(Err(e.to_string())),
        }
    })
}
