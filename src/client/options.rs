//! Client connection options.
//!
//! Provides a type-safe interface for configuring timeouts, back-pressure
//! and wire tracing.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use cdp_client::ClientOptions;
//!
//! let options = ClientOptions::new()
//!     .with_connect_timeout(Duration::from_secs(5))
//!     .with_command_timeout(Duration::from_secs(10))
//!     .with_send_tracing()
//!     .with_receive_tracing();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::transport::TraceConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default WebSocket handshake timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// ClientOptions
// ============================================================================

/// Client connection configuration.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Maximum time for the WebSocket handshake.
    pub connect_timeout: Duration,

    /// Timeout applied to every command. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,

    /// Refuse new commands once this many are in flight.
    pub max_pending_requests: Option<usize>,

    /// Wire tracing switches.
    pub trace: TraceConfig,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates options with default settings.
    ///
    /// 30s connect timeout, no command timeout, no pending limit,
    /// tracing disabled.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            command_timeout: None,
            max_pending_requests: None,
            trace: TraceConfig::disabled(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets a timeout for every command.
    #[inline]
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Limits the number of in-flight commands.
    #[inline]
    #[must_use]
    pub fn with_max_pending_requests(mut self, limit: usize) -> Self {
        self.max_pending_requests = Some(limit);
        self
    }

    /// Replaces the tracing configuration.
    #[inline]
    #[must_use]
    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    /// Traces outbound requests.
    #[inline]
    #[must_use]
    pub fn with_send_tracing(mut self) -> Self {
        self.trace = self.trace.with_send(true);
        self
    }

    /// Traces inbound responses and events.
    #[inline]
    #[must_use]
    pub fn with_receive_tracing(mut self) -> Self {
        self.trace = self.trace.with_receive(true);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
