//! Error types for the CDP client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use cdp_client::{Client, Result};
//!
//! async fn example(client: &Client) -> Result<()> {
//!     client.ensure_minimum_protocol_version("1.3").await?;
//!     let png = client.take_screenshot().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`], [`Error::WebSocket`] |
//! | Protocol | [`Error::Protocol`], [`Error::MalformedMessage`], [`Error::InvalidArgument`] |
//! | Requests | [`Error::RequestTimeout`], [`Error::TooManyPendingRequests`] |
//! | Version | [`Error::VersionTooOld`] |
//! | Screenshot | [`Error::ScreenshotUnsupported`], [`Error::ScreenshotFailed`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::Base64`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use base64::DecodeError;
use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;
use crate::protocol::ProtocolVersion;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the debugging endpoint cannot be reached, the URL is
    /// unusable, or the handshake fails.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Handshake did not complete in time.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Connection is closing or closed.
    ///
    /// Returned to pending requests on shutdown and to any operation
    /// attempted afterwards.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// The remote answered a command with an error payload.
    #[error("Protocol error {code}: {message}")]
    Protocol {
        /// Remote error code (JSON-RPC style, e.g. `-32601`).
        code: i64,
        /// Remote error message.
        message: String,
        /// Optional extra detail from the remote.
        data: Option<Value>,
    },

    /// Inbound message could not be interpreted.
    #[error("Malformed message: {message}")]
    MalformedMessage {
        /// Description of what was wrong.
        message: String,
    },

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Pending request limit reached.
    #[error("Too many pending requests (limit {limit})")]
    TooManyPendingRequests {
        /// Configured limit.
        limit: usize,
    },

    // ========================================================================
    // Version Errors
    // ========================================================================
    /// Remote protocol version is older than required.
    #[error("Protocol version too old: required {required}, actual {actual}")]
    VersionTooOld {
        /// Minimum version the caller asked for.
        required: ProtocolVersion,
        /// Version reported by the remote.
        actual: ProtocolVersion,
    },

    // ========================================================================
    // Screenshot Errors
    // ========================================================================
    /// Screenshots are not available on this remote.
    #[error(
        "Screenshots require a browser speaking DevTools protocol {minimum} or newer: {source}"
    )]
    ScreenshotUnsupported {
        /// Minimum protocol version for screenshots.
        minimum: ProtocolVersion,
        /// The version check failure.
        #[source]
        source: Box<Error>,
    },

    /// The remote failed to capture a screenshot.
    #[error("Screenshot capture failed: {source}")]
    ScreenshotFailed {
        /// The underlying remote failure.
        #[source]
        source: Box<Error>,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Base64 decoding error.
    #[error("Base64 error: {0}")]
    Base64(#[from] DecodeError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error from a remote error payload.
    #[inline]
    pub fn protocol(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            data,
        }
    }

    /// Creates a malformed message error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a version too old error.
    #[inline]
    pub fn version_too_old(required: ProtocolVersion, actual: ProtocolVersion) -> Self {
        Self::VersionTooOld { required, actual }
    }

    /// Wraps a version check failure as a screenshot capability error.
    #[inline]
    pub fn screenshot_unsupported(minimum: ProtocolVersion, source: Error) -> Self {
        Self::ScreenshotUnsupported {
            minimum,
            source: Box::new(source),
        }
    }

    /// Wraps a remote failure as a screenshot capture error.
    #[inline]
    pub fn screenshot_failed(source: Error) -> Self {
        Self::ScreenshotFailed {
            source: Box::new(source),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::RequestTimeout { .. }
        )
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if the remote rejected the command.
    #[inline]
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry. Retrying is left to the caller.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. }
                | Self::RequestTimeout { .. }
                | Self::TooManyPendingRequests { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
