//! DevTools protocol message types.
//!
//! This module defines the JSON messages exchanged with the remote
//! debugging endpoint.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command with correlation ID |
//! | `Response` | Remote → Local | Result or error for one request |
//! | `Event` | Remote → Local | Browser notification, no correlation |
//!
//! # Command Naming
//!
//! Commands follow the CDP `Domain.methodName` format:
//!
//! - `Browser.getVersion`
//! - `Page.captureScreenshot`
//! - `Page.navigate`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Command definitions by domain |
//! | `event` | Event and event name types |
//! | `request` | Request, Response and inbound classification |
//! | `version` | Protocol and browser version types |

// ============================================================================
// Submodules
// ============================================================================

/// Command definitions organized by domain.
pub mod command;

/// Event message types.
pub mod event;

/// Request and Response message types.
pub mod request;

/// Protocol version types.
pub mod version;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{BrowserCommand, Command, PageCommand, RawCommand};
pub use event::{Event, EventName};
pub use request::{InboundMessage, RemoteError, Request, Response};
pub use version::{BrowserVersion, ProtocolVersion};
