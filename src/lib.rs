//! CDP client - Asynchronous Chrome DevTools Protocol client core.
//!
//! This library speaks the DevTools Protocol to a browser's remote
//! debugging endpoint over a single WebSocket.
//!
//! # Architecture
//!
//! The client follows a correlated RPC model:
//!
//! - **Local End (Rust)**: Sends commands with sequential IDs, receives
//!   responses and events
//! - **Remote End (Browser)**: Executes commands, answers by ID, emits events
//!
//! Key design principles:
//!
//! - Each [`Client`] owns: one WebSocket connection + one event loop task
//! - Protocol uses `Domain.methodName` format (`Page.captureScreenshot`)
//! - Many commands can be in flight at once; each awaits its own response
//! - Events fan out to listeners by name, in registration order
//!
//! # Quick Start
//!
//! ```no_run
//! use cdp_client::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::connect("ws://127.0.0.1:9222/devtools/page/ABC").await?;
//!
//!     let version = client.get_protocol_version().await?;
//!     println!("Protocol version: {version}");
//!
//!     let png = client.take_screenshot().await?;
//!     println!("Screenshot: {} bytes of data URI", png.len());
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`] facade, options, version gate, screenshots |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Protocol message types |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Client facade.
///
/// Use [`Client::connect`] to open a connection.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// DevTools protocol message types.
///
/// Commands, responses, events and version types.
pub mod protocol;

/// WebSocket transport layer.
///
/// Connection, correlation, event dispatch and wire tracing.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientOptions, ImageFormat, SCREENSHOT_MIN_PROTOCOL, ScreenshotBuilder};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::RequestId;

// Protocol types
pub use protocol::{
    BrowserCommand, BrowserVersion, Command, Event, EventName, PageCommand, ProtocolVersion,
};

// Transport types
pub use transport::{ConnectionState, Direction, TraceConfig, TraceSink, TracingSink};
