//! Shared fixtures: an in-memory gateway transport, canned frames, and
//! recording listeners.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use accord_core::traits::{ConnectOptions, ConnectionHandle, GatewayConnection, GatewayTransport};
use accord_core::{ApiUrl, Event, EventKind, EventListener, GatewayFrame, Result, SessionToken};

/// An in-memory gateway transport fed by a [`GatewayController`].
pub struct FakeTransport {
    rx: Mutex<Option<mpsc::UnboundedReceiver<GatewayFrame>>>,
    closed: Arc<AtomicBool>,
}

/// Test-side handle for driving a [`FakeTransport`].
pub struct GatewayController {
    tx: Mutex<Option<mpsc::UnboundedSender<GatewayFrame>>>,
    closed: Arc<AtomicBool>,
}

pub fn fake_gateway() -> (FakeTransport, GatewayController) {
    let (tx, rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));
    (
        FakeTransport {
            rx: Mutex::new(Some(rx)),
            closed: closed.clone(),
        },
        GatewayController {
            tx: Mutex::new(Some(tx)),
            closed,
        },
    )
}

impl GatewayController {
    pub fn send(&self, frame: GatewayFrame) {
        if let Some(tx) = self.tx.lock().unwrap().as_ref() {
            let _ = tx.send(frame);
        }
    }

    /// End the frame stream, simulating the server dropping the connection.
    pub fn drop_connection(&self) {
        self.tx.lock().unwrap().take();
    }

    /// Whether the session asked the connection to close.
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct FakeHandle {
    cancel: CancellationToken,
    closed: Arc<AtomicBool>,
}

impl ConnectionHandle for FakeHandle {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.cancel.cancel();
    }
}

#[async_trait]
impl GatewayTransport for FakeTransport {
    async fn connect(
        &self,
        _token: &SessionToken,
        _options: &ConnectOptions,
    ) -> Result<GatewayConnection> {
        let mut rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("fake transport connected twice");
        let cancel = CancellationToken::new();
        let handle = FakeHandle {
            cancel: cancel.clone(),
            closed: self.closed.clone(),
        };

        let stream = async_stream::stream! {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    frame = rx.recv() => match frame {
                        Some(frame) => yield Ok(frame),
                        None => break,
                    },
                }
            }
        };

        Ok(GatewayConnection::new(stream, handle))
    }
}

// ============================================================================
// Canned frames
// ============================================================================

pub fn ready_frame() -> GatewayFrame {
    GatewayFrame::dispatch(
        "READY",
        json!({
            "session_id": "sess-1",
            "user": {"id": "42", "username": "alice", "email": "alice@example.com"}
        }),
    )
}

pub fn message_frame(id: &str, channel_id: &str, content: &str) -> GatewayFrame {
    GatewayFrame::dispatch(
        "MESSAGE_CREATE",
        json!({"id": id, "channel_id": channel_id, "author_id": "42", "content": content}),
    )
}

pub fn bulk_delete_frame(channel_id: &str, ids: &[&str]) -> GatewayFrame {
    GatewayFrame::dispatch("MESSAGE_DELETE_BULK", json!({"channel_id": channel_id, "ids": ids}))
}

// ============================================================================
// Listeners
// ============================================================================

/// Records the kind of every received event.
#[derive(Default)]
pub struct Recorder {
    kinds: Mutex<Vec<EventKind>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.kinds.lock().unwrap().clone()
    }
}

impl EventListener for Recorder {
    fn on_event(&self, event: &Event) {
        self.kinds.lock().unwrap().push(event.kind());
    }
}

/// Panics on every event.
pub struct Panicker;

impl EventListener for Panicker {
    fn on_event(&self, _event: &Event) {
        panic!("listener fault");
    }
}

// ============================================================================
// Mock API helpers
// ============================================================================

pub fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(format!("http://127.0.0.1:{}", server.address().port())).unwrap()
}

/// Mount a login endpoint that issues a token without a second factor.
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .mount(server)
        .await;
}
