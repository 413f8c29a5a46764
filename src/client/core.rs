//! Core Client struct, commands, events and shutdown.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::OnceCell;
use url::Url;

use crate::error::Result;
use crate::protocol::{Command, Event, EventName, ProtocolVersion};
use crate::transport::{Connection, ConnectionState};

use super::ClientOptions;

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a client.
pub(crate) struct ClientInner {
    /// The one connection this client speaks over.
    pub connection: Connection,
    /// Protocol version, queried at most once.
    pub protocol_version: OnceCell<ProtocolVersion>,
}

// ============================================================================
// Client
// ============================================================================

/// A handle to a DevTools connection.
///
/// Cloning is cheap; all clones share the same connection, pending
/// requests, listeners and version cache.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.connection.url().as_str())
            .field("state", &self.inner.connection.state())
            .field("protocol_version", &self.inner.protocol_version.get())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Connects with default options.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`](crate::Error::Connection) if the endpoint
    ///   cannot be reached or the handshake fails
    /// - [`Error::ConnectionTimeout`](crate::Error::ConnectionTimeout) if
    ///   the handshake takes longer than 30s
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_options(url, ClientOptions::new()).await
    }

    /// Connects with custom options.
    ///
    /// # Errors
    ///
    /// Same as [`Client::connect`].
    pub async fn connect_with_options(url: &str, options: ClientOptions) -> Result<Self> {
        let connection = Connection::connect(url, &options).await?;
        Ok(Self::from_connection(connection))
    }

    /// Wraps an established connection.
    pub(crate) fn from_connection(connection: Connection) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                connection,
                protocol_version: OnceCell::new(),
            }),
        }
    }
}

// ============================================================================
// Client - Accessors
// ============================================================================

impl Client {
    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        self.inner.connection.url()
    }

    /// Returns the connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.connection.state()
    }

    /// Returns `true` until shutdown begins.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }
}

// ============================================================================
// Client - Commands
// ============================================================================

impl Client {
    /// Sends a command by method name and waits for its result.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = client
    ///     .send("Runtime.evaluate", Some(json!({ "expression": "1 + 1" })))
    ///     .await?;
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`](crate::Error::ConnectionClosed) if the
    ///   client is closed or closes while waiting
    /// - [`Error::Protocol`](crate::Error::Protocol) if the remote rejects
    ///   the command
    pub async fn send(&self, method: impl Into<String>, params: Option<Value>) -> Result<Value> {
        self.inner
            .connection
            .send(Command::raw(method, params))
            .await
    }

    /// Sends a typed command.
    ///
    /// # Errors
    ///
    /// Same as [`Client::send`].
    pub async fn send_command(&self, command: impl Into<Command>) -> Result<Value> {
        self.inner.connection.send(command.into()).await
    }

    /// Sends a command, giving up after `timeout`.
    ///
    /// The request is forgotten locally on timeout; a late response is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Same as [`Client::send`], plus
    /// [`Error::RequestTimeout`](crate::Error::RequestTimeout).
    pub async fn send_with_timeout(
        &self,
        method: impl Into<String>,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value> {
        self.inner
            .connection
            .send_with_timeout(Command::raw(method, params), timeout)
            .await
    }
}

// ============================================================================
// Client - Events
// ============================================================================

impl Client {
    /// Registers a listener for an event.
    ///
    /// Listeners for the same event run in registration order on the
    /// connection's event loop, receiving each event's params. There is no
    /// unregister; listeners live as long as the connection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// client.on(EventName::PageLoadEventFired, |event| {
    ///     println!("loaded at {}", event.params["timestamp"]);
    /// })?;
    /// client.on("Network.requestWillBeSent", |event| { /* ... */ })?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`](crate::Error::ConnectionClosed)
    /// once the client is closing or closed.
    pub fn on<F>(&self, event: impl Into<EventName>, listener: F) -> Result<()>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.inner.connection.on(&event.into(), Arc::new(listener))
    }
}

// ============================================================================
// Client - Shutdown
// ============================================================================

impl Client {
    /// Closes the connection.
    ///
    /// Every pending command fails with
    /// [`Error::ConnectionClosed`](crate::Error::ConnectionClosed); no
    /// event is delivered after this returns. Safe to call repeatedly and
    /// from several clones.
    pub async fn close(&self) {
        self.inner.connection.close().await;
    }
}

// ============================================================================
// Tests
// ============================================================================
