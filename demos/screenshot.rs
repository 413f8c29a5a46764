//! Version check and screenshot capture.
//!
//! Demonstrates:
//! - Connecting to a DevTools endpoint
//! - Querying browser and protocol versions
//! - Gating on a minimum protocol version
//! - Capturing PNG and JPEG screenshots
//!
//! Usage:
//!   cargo run --example screenshot -- --url ws://127.0.0.1:9222/devtools/page/<id>
//!   cargo run --example screenshot -- --debug
//!   cargo run --example screenshot -- --trace

mod common;

// ============================================================================
// Imports
// ============================================================================

use cdp_client::{Client, ClientOptions, Error, Result};

use common::Args;

// ============================================================================
// Constants
// ============================================================================

const PNG_PATH: &str = "./screenshot.png";
const JPEG_PATH: &str = "./screenshot.jpg";

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    common::init_logging(&args);

    let mut options = ClientOptions::new();
    if args.trace {
        options = options.with_send_tracing().with_receive_tracing();
    }

    println!("[1] Connecting to {}", args.url);
    let client = Client::connect_with_options(&args.url, options).await?;

    let info = client.browser_version().await?;
    println!("    Product:  {}", info.product);
    println!("    Protocol: {}", client.get_protocol_version().await?);

    println!("[2] Capturing PNG");
    match client.take_screenshot().await {
        Ok(uri) => println!("    Data URI: {} chars", uri.len()),
        Err(Error::ScreenshotUnsupported { minimum, .. }) => {
            println!("    Browser too old, screenshots need protocol {minimum}");
            client.close().await;
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    println!("[3] Saving {PNG_PATH} and {JPEG_PATH}");
    client.save_screenshot(PNG_PATH).await?;
    client.screenshot().jpeg(70).save(JPEG_PATH).await?;

    client.close().await;
    println!("Done");
    Ok(())
}
