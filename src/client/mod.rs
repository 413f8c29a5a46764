//! DevTools client facade.
//!
//! A [`Client`] owns one connection to a remote debugging endpoint and
//! exposes only the sanctioned operations: sending commands, listening
//! for events, version negotiation, screenshots and shutdown. The
//! underlying [`Connection`](crate::transport::Connection) is never
//! handed out.
//!
//! # Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Client struct, commands, events, shutdown |
//! | `options` | Connection and tracing options |
//! | `version` | Protocol version query and minimum-version gate |
//! | `screenshot` | Page screenshots |
//!
//! # Example
//!
//! ```ignore
//! let client = Client::connect("ws://127.0.0.1:9222/devtools/page/ABC").await?;
//!
//! client.on(EventName::PageLoadEventFired, |event| {
//!     println!("loaded: {}", event.params);
//! })?;
//!
//! client.send_command(PageCommand::Enable).await?;
//! client.ensure_minimum_protocol_version("1.3").await?;
//!
//! let data_uri = client.take_screenshot().await?;
//! client.screenshot().jpeg(80).save("page.jpg").await?;
//!
//! client.close().await;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod options;
mod screenshot;
mod version;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Client;
pub use options::ClientOptions;
pub use screenshot::{ImageFormat, SCREENSHOT_MIN_PROTOCOL, ScreenshotBuilder};
