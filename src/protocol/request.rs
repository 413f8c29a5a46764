//! Request and Response message types.
//!
//! Defines the message format for command requests and responses
//! between local end (Rust) and the remote debugging endpoint, plus the
//! classification of raw inbound frames.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::{Command, Event};

// ============================================================================
// Request
// ============================================================================

/// A command request from local end to remote end.
///
/// # Format
///
/// ```json
/// {
///   "id": 1,
///   "method": "Domain.methodName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Sequential identifier for request/response correlation.
    pub id: RequestId,

    /// Command with method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a new request.
    #[inline]
    #[must_use]
    pub fn new(id: RequestId, command: Command) -> Self {
        Self { id, command }
    }

    /// Returns the wire method name.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &str {
        self.command.method()
    }
}

// ============================================================================
// Response
// ============================================================================

/// A response from remote end to local end.
///
/// # Format
///
/// Success:
/// ```json
/// { "id": 1, "result": { ... } }
/// ```
///
/// Error:
/// ```json
/// { "id": 1, "error": { "code": -32601, "message": "'Foo.bar' wasn't found" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result data (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload (if error).
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl Response {
    /// Returns `true` if this is an error response.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Extracts the result value, returning error if response was error.
    ///
    /// A success response without a `result` field yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] carrying the remote's code and message.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(error) => Err(Error::protocol(error.code, error.message, error.data)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }

    /// Keeps a response whose `id` is valid but whose `error` is not a
    /// well-formed error object, so the waiting request still fails.
    fn salvage(value: &Value) -> Option<Self> {
        let id = RequestId::deserialize(value.get("id")?).ok()?;
        let raw = value.get("error")?;

        Some(Self {
            id,
            result: None,
            error: Some(RemoteError::from_raw(raw)),
        })
    }
}

// ============================================================================
// RemoteError
// ============================================================================

/// Error object carried by an error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Error code.
    #[serde(default)]
    pub code: i64,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Optional extra detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RemoteError {
    /// Reads what it can from a non-conforming `error` value.
    ///
    /// The raw value is kept as `data`; a bare string becomes the message.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| raw.as_str())
            .map_or_else(|| raw.to_string(), str::to_string);

        Self {
            code: raw.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message,
            data: Some(raw.clone()),
        }
    }
}

// ============================================================================
// InboundMessage
// ============================================================================

/// A classified inbound frame.
#[derive(Debug, Clone)]
pub enum InboundMessage {
    /// Answer to one of our requests.
    Response(Response),
    /// Uncorrelated notification.
    Event(Event),
}

impl InboundMessage {
    /// Classifies a parsed inbound JSON value.
    ///
    /// `id` together with `result` or `error` is a response; otherwise a
    /// `method` makes it an event. A response with a usable `id` but a
    /// misshapen `error` still classifies as a failed response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMessage`] if the value is neither, or
    /// [`Error::Json`] if the fields have the wrong shape.
    pub fn from_value(value: Value) -> Result<Self> {
        let has_id = value.get("id").is_some();
        let is_reply = value.get("result").is_some() || value.get("error").is_some();

        if has_id && is_reply {
            let response = match Response::deserialize(&value) {
                Ok(response) => response,
                Err(e) => Response::salvage(&value).ok_or(e)?,
            };
            return Ok(Self::Response(response));
        }

        if value.get("method").is_some() {
            return Ok(Self::Event(serde_json::from_value(value)?));
        }

        Err(Error::malformed(
            "message carries neither a response id nor a method",
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
