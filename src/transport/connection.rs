//! WebSocket connection and event loop.
//!
//! This module handles the WebSocket connection to the remote debugging
//! endpoint, including request/response correlation and event routing.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Incoming messages from the remote (responses, events), one at a time
//!   in arrival order
//! - Outgoing requests queued by callers
//! - Request/response correlation by sequential ID
//! - Event listener callbacks
//!
//! When the loop ends, for whatever reason, every pending request fails
//! with [`Error::ConnectionClosed`] and the state becomes
//! [`ConnectionState::Closed`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, from_str};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};
use url::Url;

use crate::client::ClientOptions;
use crate::error::{Error, Result};
use crate::identifiers::{RequestId, RequestIdSequence};
use crate::protocol::{Command, EventName, InboundMessage, Request, Response};

use super::dispatch::{EventDispatcher, EventListener};
use super::trace::{Direction, TraceConfig};

// ============================================================================
// Types
// ============================================================================

/// One in-flight command.
struct PendingRequest {
    /// Method name, for diagnostics.
    method: String,
    /// When the request was registered.
    created_at: Instant,
    /// Completes the caller's future.
    response_tx: oneshot::Sender<Result<Value>>,
}

/// Map of request IDs to pending requests.
type PendingMap = FxHashMap<RequestId, PendingRequest>;

/// Connection lifecycle.
///
/// `Connecting → Open → Closing → Closed`. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Accepting commands and delivering events.
    Open,
    /// Shutdown requested; new commands are refused.
    Closing,
    /// Event loop finished; all pending requests have failed.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the event loop.
enum ConnectionCommand {
    /// Write a serialized request.
    Write { id: RequestId, text: String },
    /// Close the socket and stop the loop.
    Shutdown,
}

// ============================================================================
// Shared
// ============================================================================

/// State shared between callers and the event loop.
struct Shared {
    state: Mutex<ConnectionState>,
    ids: RequestIdSequence,
    pending: Mutex<PendingMap>,
    dispatcher: EventDispatcher,
    trace: TraceConfig,
    closed_tx: watch::Sender<bool>,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to a remote debugging endpoint.
///
/// Handles request/response correlation and event routing.
/// The connection spawns an internal event loop task, which stops when
/// [`Connection::close`] is called, the remote hangs up, or the
/// connection is dropped.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync` and can be shared across tasks.
pub struct Connection {
    /// Endpoint URL.
    url: Url,
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    /// State shared with the event loop.
    shared: Arc<Shared>,
    /// Applied to every `send` unless overridden.
    command_timeout: Option<Duration>,
    /// Upper bound on in-flight requests.
    max_pending_requests: Option<usize>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("url", &self.url.as_str())
            .field("state", &self.state())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connects to a `ws://` or `wss://` debugging URL.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the URL is invalid or the handshake fails
    /// - [`Error::ConnectionTimeout`] if the handshake exceeds
    ///   `options.connect_timeout`
    pub async fn connect(url: &str, options: &ClientOptions) -> Result<Self> {
        let url = parse_endpoint(url)?;

        debug!(%url, state = %ConnectionState::Connecting, "Connecting to DevTools endpoint");

        let (ws_stream, _) = timeout(options.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| Error::connection_timeout(options.connect_timeout.as_millis() as u64))?
            .map_err(|e| Error::connection(format!("WebSocket handshake with {url} failed: {e}")))?;

        info!(%url, "DevTools connection established");

        Ok(Self::from_stream(url, ws_stream, options))
    }

    /// Wraps an already-upgraded WebSocket stream.
    ///
    /// Spawns the event loop task internally; must be called within a
    /// tokio runtime.
    pub fn from_stream<S>(url: Url, ws_stream: WebSocketStream<S>, options: &ClientOptions) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (closed_tx, _) = watch::channel(false);

        let shared = Arc::new(Shared {
            state: Mutex::new(ConnectionState::Open),
            ids: RequestIdSequence::new(),
            pending: Mutex::new(PendingMap::default()),
            dispatcher: EventDispatcher::new(),
            trace: options.trace.clone(),
            closed_tx,
        });

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&shared),
        ));

        Self {
            url,
            command_tx,
            shared,
            command_timeout: options.command_timeout,
            max_pending_requests: options.max_pending_requests,
        }
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Registers an event listener.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] unless the connection is open.
    pub fn on(&self, event: &EventName, listener: EventListener) -> Result<()> {
        if self.state() != ConnectionState::Open {
            return Err(Error::ConnectionClosed);
        }

        self.shared.dispatcher.register(event, listener);
        debug!(event = %event, "Event listener registered");
        Ok(())
    }

    /// Sends a command and waits for its response.
    ///
    /// Uses the configured command timeout, if any. Dropping the returned
    /// future cancels the request locally; a late response is ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is not open or
    ///   closes before the response arrives
    /// - [`Error::Protocol`] if the remote answers with an error
    /// - [`Error::RequestTimeout`] if the configured timeout elapses
    /// - [`Error::TooManyPendingRequests`] if the pending limit is reached
    pub async fn send(&self, command: Command) -> Result<Value> {
        self.dispatch_request(command, self.command_timeout).await
    }

    /// Sends a command with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Same as [`Connection::send`].
    pub async fn send_with_timeout(&self, command: Command, request_timeout: Duration) -> Result<Value> {
        self.dispatch_request(command, Some(request_timeout)).await
    }

    /// Shuts down the connection.
    ///
    /// Returns once the event loop has stopped and every pending request
    /// has failed. Calling it again is a no-op.
    pub async fn close(&self) {
        {
            let mut state = self.shared.state.lock();
            match *state {
                ConnectionState::Closed => return,
                ConnectionState::Connecting | ConnectionState::Open => {
                    *state = ConnectionState::Closing;
                }
                ConnectionState::Closing => {}
            }
        }

        // An error means the loop is already tearing down.
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);

        self.closed().await;
    }

    /// Waits until the event loop has stopped.
    pub async fn closed(&self) {
        let mut closed_rx = self.shared.closed_tx.subscribe();
        let _ = closed_rx.wait_for(|closed| *closed).await;
    }

    /// Registers a pending request, queues the write and awaits the answer.
    async fn dispatch_request(
        &self,
        command: Command,
        request_timeout: Option<Duration>,
    ) -> Result<Value> {
        if self.state() != ConnectionState::Open {
            return Err(Error::ConnectionClosed);
        }

        let (response_tx, response_rx) = oneshot::channel();
        let method = command.method().to_string();

        // Allocate and register under one lock so a rejected request
        // does not consume an ID.
        let id = {
            let mut pending = self.shared.pending.lock();

            if let Some(limit) = self.max_pending_requests
                && pending.len() >= limit
            {
                warn!(pending = pending.len(), max = limit, "Too many pending requests");
                return Err(Error::TooManyPendingRequests { limit });
            }

            let id = self.shared.ids.next_id();
            pending.insert(
                id,
                PendingRequest {
                    method: method.clone(),
                    created_at: Instant::now(),
                    response_tx,
                },
            );
            id
        };

        // Removes the entry on every early return and on cancellation.
        let _guard = PendingGuard {
            id,
            pending: &self.shared.pending,
        };

        let payload = serde_json::to_value(Request::new(id, command))?;
        self.shared.trace.observe(Direction::Send, &payload);

        self.command_tx
            .send(ConnectionCommand::Write {
                id,
                text: payload.to_string(),
            })
            .map_err(|_| Error::ConnectionClosed)?;

        trace!(%id, %method, "Request queued");

        let received = match request_timeout {
            Some(limit) => timeout(limit, response_rx)
                .await
                .map_err(|_| Error::request_timeout(id, limit.as_millis() as u64))?,
            None => response_rx.await,
        };

        // A dropped sender means teardown raced us.
        received.unwrap_or(Err(Error::ConnectionClosed))
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        shared: Arc<Shared>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        // Teardown runs from Drop so it also happens if a listener panics.
        let mut teardown = Teardown {
            shared: Arc::clone(&shared),
            command_rx,
        };

        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Incoming messages from the remote
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &shared);
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(?frame, "WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from callers
                command = teardown.command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Write { id, text }) => {
                            Self::handle_write(id, text, &mut ws_write, &shared).await;
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            if let Err(e) = ws_write.close().await {
                                debug!(error = %e, "Close handshake failed");
                            }
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Handles an incoming text frame.
    fn handle_incoming_message(text: &str, shared: &Shared) {
        let value: Value = match from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to parse incoming message");
                return;
            }
        };

        shared.trace.observe(Direction::Receive, &value);

        // Nothing is delivered once shutdown has begun.
        if shared.state() != ConnectionState::Open {
            trace!("Dropping message received while closing");
            return;
        }

        match InboundMessage::from_value(value) {
            Ok(InboundMessage::Response(response)) => Self::resolve_response(response, shared),
            Ok(InboundMessage::Event(event)) => {
                let delivered = shared.dispatcher.dispatch(&event);
                trace!(method = %event.method, delivered, "Event dispatched");
            }
            Err(e) => warn!(error = %e, "Ignoring unrecognized message"),
        }
    }

    /// Completes the pending request matching the response ID.
    fn resolve_response(response: Response, shared: &Shared) {
        let id = response.id;
        let entry = shared.pending.lock().remove(&id);

        let Some(pending) = entry else {
            if id.as_u64() <= shared.ids.issued() {
                // Duplicate, cancelled or timed out. Tolerated.
                debug!(%id, "Response for request no longer pending");
            } else {
                warn!(%id, "Response for unknown request");
            }
            return;
        };

        trace!(
            %id,
            method = %pending.method,
            elapsed_ms = pending.created_at.elapsed().as_millis() as u64,
            error = response.is_error(),
            "Response received"
        );

        let _ = pending.response_tx.send(response.into_result());
    }

    /// Writes one request to the socket.
    async fn handle_write<S>(
        id: RequestId,
        text: String,
        ws_write: &mut SplitSink<WebSocketStream<S>, Message>,
        shared: &Shared,
    ) where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        if let Err(e) = ws_write.send(Message::Text(text.into())).await {
            error!(%id, error = %e, "Failed to write request");

            let entry = shared.pending.lock().remove(&id);
            if let Some(pending) = entry {
                let _ = pending.response_tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%id, "Request sent");
    }
}

// ============================================================================
// PendingGuard
// ============================================================================

/// Removes a pending entry when the caller stops waiting.
struct PendingGuard<'a> {
    id: RequestId,
    pending: &'a Mutex<PendingMap>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.pending.lock().remove(&self.id).is_some() {
            debug!(id = %self.id, "Pending request abandoned by caller");
        }
    }
}

// ============================================================================
// Teardown
// ============================================================================

/// Owned by the event loop; fails everything outstanding when dropped.
struct Teardown {
    shared: Arc<Shared>,
    command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
}

impl Drop for Teardown {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            if *state != ConnectionState::Closed {
                *state = ConnectionState::Closing;
            }
        }

        // Refuse new writes, then discard queued ones. Their pending
        // entries are failed below.
        self.command_rx.close();
        while self.command_rx.try_recv().is_ok() {}

        let pending: Vec<_> = self.shared.pending.lock().drain().collect();
        let count = pending.len();

        for (_, request) in pending {
            let _ = request.response_tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }

        self.shared.set_state(ConnectionState::Closed);
        self.shared.closed_tx.send_replace(true);

        debug!("Event loop terminated");
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Validates a debugging endpoint URL.
fn parse_endpoint(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::connection(format!("invalid debugging URL {url:?}: {e}")))?;

    match parsed.scheme() {
        "ws" | "wss" => Ok(parsed),
        other => Err(Error::connection(format!(
            "unsupported scheme {other:?} in {url:?}, expected ws or wss"
        ))),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio::net::{TcpListener, TcpStream};

    use crate::protocol::BrowserCommand;

    /// Connects a client connection to an in-process server socket.
    async fn socket_pair(options: &ClientOptions) -> (Connection, WebSocketStream<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("ws://{}", listener.local_addr().expect("addr"));

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            tokio_tungstenite::accept_async(stream).await.expect("upgrade")
        });

        let connection = Connection::connect(&url, options).await.expect("connect");
        let server = server.await.expect("server task");
        (connection, server)
    }

    async fn next_json(server: &mut WebSocketStream<TcpStream>) -> Value {
        loop {
            match server.next().await.expect("frame").expect("ok") {
                Message::Text(text) => return serde_json::from_str(&text).expect("json"),
                _ => continue,
            }
        }
    }

    #[test]
    fn test_parse_endpoint() {
        assert!(parse_endpoint("ws://127.0.0.1:9222/devtools/browser/abc").is_ok());
        assert!(parse_endpoint("wss://example.com/devtools").is_ok());

        let err = parse_endpoint("http://127.0.0.1:9222").unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));

        let err = parse_endpoint("not a url").unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert_eq!(ConnectionState::Closed.to_string(), "closed");
    }

    #[tokio::test]
    async fn test_request_written_with_sequential_ids() {
        let (connection, mut server) = socket_pair(&ClientOptions::new()).await;
        let connection = Arc::new(connection);

        let first = tokio::spawn({
            let connection = Arc::clone(&connection);
            async move { connection.send(BrowserCommand::GetVersion.into()).await }
        });

        let request = next_json(&mut server).await;
        assert_eq!(request, json!({ "id": 1, "method": "Browser.getVersion" }));

        server
            .send(Message::Text(
                json!({ "id": 1, "result": { "protocolVersion": "1.3" } })
                    .to_string()
                    .into(),
            ))
            .await
            .expect("reply");

        let result = first.await.expect("join").expect("result");
        assert_eq!(result["protocolVersion"], "1.3");
        assert_eq!(connection.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_removes_pending_entry() {
        let (connection, mut server) = socket_pair(&ClientOptions::new()).await;

        let err = connection
            .send_with_timeout(Command::raw("Slow.method", None), Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::RequestTimeout { request_id, .. } if request_id == RequestId::new(1)));
        assert_eq!(connection.pending_count(), 0);

        // The late answer is tolerated.
        let request = next_json(&mut server).await;
        assert_eq!(request["id"], 1);
        server
            .send(Message::Text(json!({ "id": 1, "result": {} }).to_string().into()))
            .await
            .expect("reply");

        assert_eq!(connection.state(), ConnectionState::Open);
    }

    #[tokio::test]
    async fn test_remote_hangup_fails_pending() {
        let (connection, mut server) = socket_pair(&ClientOptions::new()).await;
        let connection = Arc::new(connection);

        let pending = tokio::spawn({
            let connection = Arc::clone(&connection);
            async move { connection.send(Command::raw("Never.answered", None)).await }
        });

        let _ = next_json(&mut server).await;
        server.close(None).await.expect("close");

        let err = pending.await.expect("join").unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));

        connection.closed().await;
        assert_eq!(connection.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn test_pending_limit() {
        let options = ClientOptions::new().with_max_pending_requests(1);
        let (connection, _server) = socket_pair(&options).await;
        let connection = Arc::new(connection);

        let blocked = tokio::spawn({
            let connection = Arc::clone(&connection);
            async move { connection.send(Command::raw("Slow.method", None)).await }
        });

        while connection.pending_count() == 0 {
            tokio::task::yield_now().await;
        }

        let err = connection
            .send(Command::raw("Other.method", None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TooManyPendingRequests { limit: 1 }));

        connection.close().await;
        assert!(matches!(blocked.await.expect("join"), Err(Error::ConnectionClosed)));
    }
}
