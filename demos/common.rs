//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

/// Endpoint used when `--url` is not given.
///
/// Start Chrome with `--remote-debugging-port=9222` and copy a
/// `webSocketDebuggerUrl` from `http://127.0.0.1:9222/json`.
pub const DEFAULT_URL: &str = "ws://127.0.0.1:9222/devtools/browser";

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub trace: bool,
    pub url: String,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let url = args
            .iter()
            .position(|a| a == "--url")
            .and_then(|i| args.get(i + 1))
            .cloned()
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        Self {
            debug: args.iter().any(|a| a == "--debug"),
            trace: args.iter().any(|a| a == "--trace"),
            url,
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
///
/// `--trace` also enables the wire log target.
pub fn init_logging(args: &Args) {
    let filter = match (args.debug, args.trace) {
        (_, true) => "cdp_client=debug,cdp_client::wire=debug",
        (true, false) => "cdp_client=debug,cdp_client::wire=off",
        (false, false) => "cdp_client=info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}
