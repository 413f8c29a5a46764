//! WebSocket transport layer.
//!
//! This module handles communication between the local end (Rust) and
//! the browser's remote debugging endpoint via WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Client (Rust)  │                              │  Browser        │
//! │                 │         WebSocket            │                 │
//! │  Connection     │◄────────────────────────────►│  DevTools       │
//! │  → event loop   │   ws://HOST:PORT/devtools/…  │  endpoint       │
//! │                 │                              │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - Validate URL, WebSocket handshake
//! 2. Event loop spawned; state is `Open`
//! 3. `Connection::send` / `Connection::on` - Commands and event listeners
//! 4. `Connection::close` - `Closing`, close frame, pending requests fail
//! 5. `Closed` - terminal
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection, correlation and event loop |
//! | `dispatch` | Event listener registry |
//! | `trace` | Optional wire tracing with payload truncation |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// Event listener registry.
pub mod dispatch;

/// Wire tracing.
pub mod trace;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionState};
pub use dispatch::{EventDispatcher, EventListener};
pub use trace::{Direction, TraceConfig, TraceSink, TracingSink, truncate_strings};
