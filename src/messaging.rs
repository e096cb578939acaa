//! Cross-context messaging between the background service and the page UI.
//!
//! The two sides never share memory: every payload crosses the boundary as a
//! serialized JSON envelope `{type, payload}`. Three message families exist:
//! fire-and-await `translate` requests answered with `{ok, data|error}`,
//! fire-and-forget `lookup-stream` requests that later produce
//! `stream-update`* followed by exactly one of `stream-complete` or
//! `stream-error`, and the hotkey `command:translate-selection` broadcast.
//! Events for one stream arrive in send order; delivery to a page that
//! navigated away is reported, never raised.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::dictionary::DictionaryEntry;
use crate::orchestrator::Orchestrator;
use crate::types::{ProviderKind, TranslationRequest, TranslationResult};

/// UI → background messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Request {
    /// Fire-and-await: answered with a serialized [`Response`]
    Translate(TranslationRequest),
    /// Fire-and-forget: answered asynchronously through stream events
    LookupStream(LookupRequest),
}

/// Payload of a `lookup-stream` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub word: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

/// Response envelope for `translate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<TranslationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(data: TranslationResult) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Background → UI messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// Accumulated raw buffer of an in-flight lookup stream
    StreamUpdate { data: String },
    /// Final validated entry; exactly one per successful stream
    StreamComplete { data: DictionaryEntry },
    /// Terminal stream failure; exactly one per failed stream
    StreamError { error: String },
    /// Hotkey broadcast: the page should open the panel with its selection
    #[serde(rename = "command:translate-selection")]
    TranslateSelection,
}

/// Outcome of a fire-and-forget delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// The receiving context is gone (page navigated away or closed)
    TargetGone,
}

/// Sender half of the channel into the active page context.
#[derive(Debug, Clone)]
pub struct PageSink {
    tx: mpsc::UnboundedSender<String>,
}

impl PageSink {
    /// Create the page channel; the receiver side belongs to the UI.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Serialize and deliver one event. A vanished receiver is reported as
    /// [`Delivery::TargetGone`] so callers can log without crashing.
    pub fn send(&self, event: &Event) -> Delivery {
        let raw = serde_json::to_string(event).expect("event serializes to JSON");
        match self.tx.send(raw) {
            Ok(()) => Delivery::Delivered,
            Err(_) => {
                tracing::debug!("page context is gone, dropping event");
                Delivery::TargetGone
            }
        }
    }
}

/// Privileged side of the protocol: owns the orchestrator and the sink into
/// the currently active page.
pub struct Background {
    orchestrator: Arc<Orchestrator>,
    page: PageSink,
}

impl Background {
    pub fn new(orchestrator: Arc<Orchestrator>, page: PageSink) -> Self {
        Self { orchestrator, page }
    }

    /// Handle one serialized message from the UI.
    ///
    /// `translate` produces exactly one serialized [`Response`];
    /// `lookup-stream` returns nothing synchronously and spawns the stream
    /// task; an unrecognized envelope is answered with a failure response.
    pub async fn dispatch(&self, raw: &str) -> Option<String> {
        let request: Request = match serde_json::from_str(raw) {
            Ok(request) => request,
            Err(err) => {
                return Some(encode_response(&Response::failure(format!(
                    "unrecognized message: {}",
                    err
                ))));
            }
        };

        match request {
            Request::Translate(request) => {
                let response = match self.orchestrator.resolve(&request).await {
                    Ok(result) => Response::success(result),
                    Err(err) => Response::failure(err.to_string()),
                };
                Some(encode_response(&response))
            }
            Request::LookupStream(request) => {
                self.spawn_lookup(request);
                None
            }
        }
    }

    /// Run one lookup stream to completion, relaying partial buffers as
    /// `stream-update` events and closing with `stream-complete` or
    /// `stream-error`. Deliveries to a vanished page are dropped silently;
    /// the stream itself is not cancelable and runs to its end.
    fn spawn_lookup(&self, request: LookupRequest) {
        let orchestrator = self.orchestrator.clone();
        let page = self.page.clone();
        tokio::spawn(async move {
            let updates = page.clone();
            let outcome = orchestrator
                .lookup_stream(&request.word, &request.target, &move |partial: &str| {
                    updates.send(&Event::StreamUpdate {
                        data: partial.to_string(),
                    });
                })
                .await;
            match outcome {
                Ok(entry) => page.send(&Event::StreamComplete { data: entry }),
                Err(err) => page.send(&Event::StreamError {
                    error: err.to_string(),
                }),
            };
        });
    }

    /// Hotkey broadcast to the currently active page context.
    pub fn broadcast_translate_selection(&self) -> Delivery {
        self.page.send(&Event::TranslateSelection)
    }
}

fn encode_response(response: &Response) -> String {
    serde_json::to_string(response).expect("response serializes to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = Request::Translate(
            TranslationRequest::new("hello", "zh").with_provider(ProviderKind::DefaultFree),
        );
        let encoded = serde_json::to_string(&request).unwrap();
        assert!(encoded.contains("\"type\":\"translate\""));
        assert!(encoded.contains("\"payload\""));
        assert!(encoded.contains("\"provider\":\"default-free\""));

        let decoded: Request = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_lookup_stream_wire_name() {
        let request = Request::LookupStream(LookupRequest {
            word: "hello".to_string(),
            target: "zh".to_string(),
            provider: Some(ProviderKind::Ai),
        });
        let encoded = serde_json::to_string(&request).unwrap();
        assert!(encoded.contains("\"type\":\"lookup-stream\""));
    }

    #[test]
    fn test_command_wire_name() {
        let encoded = serde_json::to_string(&Event::TranslateSelection).unwrap();
        assert_eq!(encoded, r#"{"type":"command:translate-selection"}"#);
    }

    #[test]
    fn test_event_wire_names() {
        let update = Event::StreamUpdate {
            data: "partial".to_string(),
        };
        assert!(
            serde_json::to_string(&update)
                .unwrap()
                .contains("\"type\":\"stream-update\"")
        );

        let error = Event::StreamError {
            error: "boom".to_string(),
        };
        assert!(
            serde_json::to_string(&error)
                .unwrap()
                .contains("\"type\":\"stream-error\"")
        );
    }

    #[test]
    fn test_response_success_shape() {
        let response = Response::success(TranslationResult::Plain {
            translation: "你好".to_string(),
        });
        let encoded = serde_json::to_string(&response).unwrap();
        assert!(encoded.contains("\"ok\":true"));
        assert!(encoded.contains("\"data\""));
        assert!(!encoded.contains("\"error\""));
    }

    #[test]
    fn test_response_failure_shape() {
        let encoded = serde_json::to_string(&Response::failure("boom")).unwrap();
        assert!(encoded.contains("\"ok\":false"));
        assert!(encoded.contains("\"error\":\"boom\""));
        assert!(!encoded.contains("\"data\""));
    }

    #[test]
    fn test_delivery_to_dropped_page_is_target_gone() {
        let (sink, rx) = PageSink::channel();
        drop(rx);
        assert_eq!(sink.send(&Event::TranslateSelection), Delivery::TargetGone);
    }

    #[test]
    fn test_delivery_to_live_page() {
        let (sink, mut rx) = PageSink::channel();
        assert_eq!(sink.send(&Event::TranslateSelection), Delivery::Delivered);
        let raw = rx.try_recv().unwrap();
        let event: Event = serde_json::from_str(&raw).unwrap();
        assert_eq!(event, Event::TranslateSelection);
    }
}
