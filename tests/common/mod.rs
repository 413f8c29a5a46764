//! Shared utilities for integration tests.
//!
//! Provides an in-process mock browser:
//! - Binds a WebSocket server on a random localhost port
//! - Records every request it receives
//! - Answers through a scripted responder
//! - Can push events or hang up on demand

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound for any wait in tests.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

// ============================================================================
// Types
// ============================================================================

/// Maps one request to the frames sent back, in order.
pub type Responder = Arc<dyn Fn(&Value) -> Vec<Value> + Send + Sync>;

/// Frames the test pushes outside the request/response flow.
enum Outbound {
    Push(Value),
    HangUp,
}

// ============================================================================
// MockBrowser
// ============================================================================

/// A scripted DevTools endpoint accepting one connection.
pub struct MockBrowser {
    url: String,
    received: Arc<Mutex<Vec<Value>>>,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl MockBrowser {
    /// Starts a mock answering every request through `responder`.
    pub async fn start(responder: impl Fn(&Value) -> Vec<Value> + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
        let url = format!(
            "ws://{}/devtools/browser/mock",
            listener.local_addr().expect("local addr")
        );

        let received = Arc::new(Mutex::new(Vec::new()));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        tokio::spawn(serve(
            listener,
            Arc::new(responder),
            Arc::clone(&received),
            outbound_rx,
        ));

        Self {
            url,
            received,
            outbound,
        }
    }

    /// Starts a mock reporting `version` and answering screenshots with `QUJD`.
    pub async fn with_protocol(version: &str) -> Self {
        Self::start(browser_responder(version)).await
    }

    /// Returns the WebSocket URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns every request received so far.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().clone()
    }

    /// Counts received requests for `method`.
    pub fn count(&self, method: &str) -> usize {
        self.received
            .lock()
            .iter()
            .filter(|request| request["method"] == method)
            .count()
    }

    /// Sends a frame to the client.
    pub fn push(&self, message: Value) {
        let _ = self.outbound.send(Outbound::Push(message));
    }

    /// Closes the socket from the server side.
    pub fn hang_up(&self) {
        let _ = self.outbound.send(Outbound::HangUp);
    }

    /// Waits until at least `n` requests have arrived.
    pub async fn wait_for_requests(&self, n: usize) {
        tokio::time::timeout(WAIT_LIMIT, async {
            while self.received.lock().len() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("requests did not arrive in time");
    }
}

async fn serve(
    listener: TcpListener,
    responder: Responder,
    received: Arc<Mutex<Vec<Value>>>,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
) {
    let Ok((stream, _)) = listener.accept().await else {
        return;
    };
    let Ok(ws_stream) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        let request: Value = serde_json::from_str(&text).expect("client sent JSON");
                        received.lock().push(request.clone());

                        for reply in responder(&request) {
                            if write.send(Message::Text(reply.to_string().into())).await.is_err() {
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                    _ => {}
                }
            }

            command = outbound_rx.recv() => {
                match command {
                    Some(Outbound::Push(message)) => {
                        if write.send(Message::Text(message.to_string().into())).await.is_err() {
                            return;
                        }
                    }
                    Some(Outbound::HangUp) | None => {
                        let _ = write.close().await;
                        return;
                    }
                }
            }
        }
    }
}

// ============================================================================
// Reply Helpers
// ============================================================================

/// Builds a success response for `request`.
pub fn reply(request: &Value, result: Value) -> Value {
    json!({ "id": request["id"], "result": result })
}

/// Builds an error response for `request`.
pub fn reply_error(request: &Value, code: i64, message: &str) -> Value {
    json!({ "id": request["id"], "error": { "code": code, "message": message } })
}

/// Builds an event frame.
pub fn event(method: &str, params: Value) -> Value {
    json!({ "method": method, "params": params })
}

/// Responder for a browser speaking `version`.
///
/// - `Browser.getVersion` → version info
/// - `Page.captureScreenshot` → `{ "data": "QUJD" }`
/// - anything else → `{}`
pub fn browser_responder(version: &str) -> impl Fn(&Value) -> Vec<Value> + Send + Sync + 'static {
    let version = version.to_string();
    move |request| match request["method"].as_str() {
        Some("Browser.getVersion") => vec![reply(
            request,
            json!({
                "protocolVersion": version,
                "product": "HeadlessChrome/120.0.6099.109",
                "revision": "@3b0d1f5",
                "userAgent": "Mozilla/5.0 HeadlessChrome",
                "jsVersion": "12.0.267.10"
            }),
        )],
        Some("Page.captureScreenshot") => vec![reply(request, json!({ "data": "QUJD" }))],
        _ => vec![reply(request, json!({}))],
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Installs a test subscriber honouring `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
