//! Event listeners.
//!
//! Demonstrates:
//! - Enabling the Page domain
//! - Registering several listeners for one event
//! - Listening by typed and raw event names
//! - Navigating and waiting for the load event
//!
//! Usage:
//!   cargo run --example events -- --url ws://127.0.0.1:9222/devtools/page/<id>
//!   cargo run --example events -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::sync::mpsc;

use cdp_client::{Client, EventName, PageCommand, Result};

use common::Args;

// ============================================================================
// Constants
// ============================================================================

const TARGET_URL: &str = "https://example.com";
const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    common::init_logging(&args);

    let client = Client::connect(&args.url).await?;
    client.send_command(PageCommand::Enable).await?;

    let (loaded_tx, mut loaded_rx) = mpsc::unbounded_channel();

    client.on(EventName::PageFrameNavigated, |event| {
        let url = event.params["frame"]["url"].as_str().unwrap_or("?");
        println!("[frameNavigated] {url}");
    })?;

    client.on("Page.domContentEventFired", |event| {
        println!("[domContentEventFired] at {}", event.params["timestamp"]);
    })?;

    client.on(EventName::PageLoadEventFired, move |event| {
        println!("[loadEventFired] at {}", event.params["timestamp"]);
        let _ = loaded_tx.send(());
    })?;

    println!("Navigating to {TARGET_URL}");
    client
        .send_command(PageCommand::Navigate {
            url: TARGET_URL.to_string(),
        })
        .await?;

    match tokio::time::timeout(LOAD_TIMEOUT, loaded_rx.recv()).await {
        Ok(_) => println!("Page loaded"),
        Err(_) => println!("No load event within {LOAD_TIMEOUT:?}"),
    }

    client.close().await;
    Ok(())
}
