//! Screenshot capture methods.

use std::ffi::OsStr;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{PageCommand, ProtocolVersion};

use super::Client;

// ============================================================================
// Constants
// ============================================================================

/// Oldest protocol version with `Page.captureScreenshot` support we rely on.
pub const SCREENSHOT_MIN_PROTOCOL: ProtocolVersion = ProtocolVersion::new(1, 3);

/// Quality used when a `.jpg`/`.jpeg` path picks the format.
const DEFAULT_JPEG_QUALITY: u8 = 85;

// ============================================================================
// ImageFormat
// ============================================================================

/// Encoding requested from `Page.captureScreenshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    /// Quality 0-100. [`ImageFormat::jpeg`] clamps out-of-range values.
    Jpeg(u8),
}

impl ImageFormat {
    /// JPEG at `quality`, clamped to 100.
    #[inline]
    #[must_use]
    pub fn jpeg(quality: u8) -> Self {
        Self::Jpeg(quality.min(100))
    }

    /// Chooses JPEG for `.jpg`/`.jpeg` paths and PNG for anything else.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("jpg" | "jpeg") => Self::jpeg(DEFAULT_JPEG_QUALITY),
            _ => Self::Png,
        }
    }

    /// MIME type used in the `data:` URI.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg(_) => "image/jpeg",
        }
    }

    fn command(self) -> PageCommand {
        let (format, quality) = match self {
            Self::Png => ("png", None),
            Self::Jpeg(quality) => ("jpeg", Some(quality)),
        };

        PageCommand::CaptureScreenshot {
            format: format.to_string(),
            quality,
        }
    }
}

// ============================================================================
// ScreenshotBuilder
// ============================================================================

/// Configures one screenshot. Created by [`Client::screenshot`].
///
/// Every capture first checks the remote speaks protocol
/// [`SCREENSHOT_MIN_PROTOCOL`] or newer.
///
/// ```ignore
/// let uri = client.screenshot().capture().await?;
/// client.screenshot().jpeg(80).save("page.jpg").await?;
/// ```
pub struct ScreenshotBuilder<'a> {
    client: &'a Client,
    format: ImageFormat,
}

impl<'a> ScreenshotBuilder<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self {
            client,
            format: ImageFormat::default(),
        }
    }

    #[must_use]
    pub fn png(self) -> Self {
        self.format(ImageFormat::Png)
    }

    /// See [`ImageFormat::jpeg`].
    #[must_use]
    pub fn jpeg(self, quality: u8) -> Self {
        self.format(ImageFormat::jpeg(quality))
    }

    #[must_use]
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Captures the screenshot and returns a `data:` URI.
    ///
    /// # Errors
    ///
    /// - [`Error::ScreenshotUnsupported`] if the remote's protocol is too old
    /// - [`Error::ScreenshotFailed`] if the remote cannot capture
    /// - connection errors unchanged
    pub async fn capture(&self) -> Result<String> {
        let data = self.capture_base64().await?;
        Ok(format!("data:{};base64,{}", self.format.mime_type(), data))
    }

    /// The raw base64 payload, without the `data:` prefix.
    ///
    /// # Errors
    ///
    /// Same as [`ScreenshotBuilder::capture`].
    pub async fn capture_base64(&self) -> Result<String> {
        self.client
            .ensure_protocol_version(SCREENSHOT_MIN_PROTOCOL)
            .await
            .map_err(|e| match e {
                Error::VersionTooOld { .. } => Error::screenshot_unsupported(SCREENSHOT_MIN_PROTOCOL, e),
                other => other,
            })?;

        debug!(format = ?self.format, "Capturing screenshot");

        let result = self
            .client
            .send_command(self.format.command())
            .await
            .map_err(|e| {
                if e.is_protocol_error() {
                    Error::screenshot_failed(e)
                } else {
                    e
                }
            })?;

        let data = result
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::screenshot_failed(Error::malformed(format!(
                    "screenshot response missing data field. Got: {result}"
                )))
            })?;

        Ok(data.to_string())
    }

    /// Decoded image bytes.
    ///
    /// # Errors
    ///
    /// Same as [`ScreenshotBuilder::capture`], plus [`Error::Base64`].
    pub async fn capture_bytes(&self) -> Result<Vec<u8>> {
        let base64_data = self.capture_base64().await?;
        Ok(Base64Standard.decode(base64_data)?)
    }

    /// Writes the decoded image to `path`; the extension is not consulted.
    ///
    /// # Errors
    ///
    /// Same as [`ScreenshotBuilder::capture_bytes`], plus [`Error::Io`].
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.capture_bytes().await?;
        tokio::fs::write(path.as_ref(), bytes).await?;
        Ok(())
    }
}

// ============================================================================
// Client - Screenshot
// ============================================================================

impl Client {
    /// Creates a screenshot builder.
    #[must_use]
    pub fn screenshot(&self) -> ScreenshotBuilder<'_> {
        ScreenshotBuilder::new(self)
    }

    /// Captures a PNG screenshot as `data:image/png;base64,<payload>`.
    ///
    /// Shorthand for `client.screenshot().png().capture().await`.
    ///
    /// # Errors
    ///
    /// - [`Error::ScreenshotUnsupported`] if the remote's protocol is older
    ///   than 1.3; the screenshot command is not sent
    /// - [`Error::ScreenshotFailed`] if the remote rejects the capture
    pub async fn take_screenshot(&self) -> Result<String> {
        self.screenshot().png().capture().await
    }

    /// Captures and writes a screenshot, encoded per [`ImageFormat::for_path`].
    ///
    /// # Errors
    ///
    /// Same as [`ScreenshotBuilder::save`].
    pub async fn save_screenshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.screenshot()
            .format(ImageFormat::for_path(path))
            .save(path)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
