//! Command definitions organized by domain.
//!
//! Commands follow the CDP `Domain.methodName` format.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `Browser` | Version query, shutdown |
//! | `Page` | Domain enable, navigation, screenshots |
//!
//! Anything else goes through [`RawCommand`], which carries a free-form
//! method name and params over the same correlation engine.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by domain.
///
/// This enum wraps domain-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Browser domain commands.
    Browser(BrowserCommand),
    /// Page domain commands.
    Page(PageCommand),
    /// Any other command, by name.
    Raw(RawCommand),
}

impl Command {
    /// Creates a raw command from a method name and optional params.
    #[inline]
    #[must_use]
    pub fn raw(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::Raw(RawCommand {
            method: method.into(),
            params,
        })
    }

    /// Returns the wire method name.
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Browser(command) => command.method(),
            Self::Page(command) => command.method(),
            Self::Raw(command) => &command.method,
        }
    }
}

impl From<BrowserCommand> for Command {
    #[inline]
    fn from(command: BrowserCommand) -> Self {
        Self::Browser(command)
    }
}

impl From<PageCommand> for Command {
    #[inline]
    fn from(command: PageCommand) -> Self {
        Self::Page(command)
    }
}

impl From<RawCommand> for Command {
    #[inline]
    fn from(command: RawCommand) -> Self {
        Self::Raw(command)
    }
}

// ============================================================================
// Browser Commands
// ============================================================================

/// Browser domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowserCommand {
    /// Query protocol version, product and user agent.
    #[serde(rename = "Browser.getVersion")]
    GetVersion,

    /// Close the browser gracefully.
    #[serde(rename = "Browser.close")]
    Close,
}

impl BrowserCommand {
    /// Returns the wire method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::GetVersion => "Browser.getVersion",
            Self::Close => "Browser.close",
        }
    }
}

// ============================================================================
// Page Commands
// ============================================================================

/// Page domain commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum PageCommand {
    /// Start receiving `Page.*` events.
    #[serde(rename = "Page.enable")]
    Enable,

    /// Stop receiving `Page.*` events.
    #[serde(rename = "Page.disable")]
    Disable,

    /// Navigate the page to a URL.
    #[serde(rename = "Page.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Reload the page.
    #[serde(rename = "Page.reload")]
    Reload {
        /// Bypass the cache when reloading.
        #[serde(rename = "ignoreCache")]
        ignore_cache: bool,
    },

    /// Capture the visible page.
    #[serde(rename = "Page.captureScreenshot")]
    CaptureScreenshot {
        /// Image format (`png` or `jpeg`).
        format: String,
        /// JPEG quality (0-100).
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<u8>,
    },
}

impl PageCommand {
    /// Returns the wire method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Enable => "Page.enable",
            Self::Disable => "Page.disable",
            Self::Navigate { .. } => "Page.navigate",
            Self::Reload { .. } => "Page.reload",
            Self::CaptureScreenshot { .. } => "Page.captureScreenshot",
        }
    }
}

// ============================================================================
// Raw Command
// ============================================================================

/// A command outside the typed set.
#[derive(Debug, Clone, Serialize)]
pub struct RawCommand {
    /// Method name in `Domain.methodName` format.
    pub method: String,

    /// Command params, omitted from the wire when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_unit_command_has_no_params() {
        let command = Command::from(BrowserCommand::GetVersion);
        let value = serde_json::to_value(&command).expect("serialize");
        assert_eq!(value, json!({ "method": "Browser.getVersion" }));
    }

    #[test]
    fn test_screenshot_command_serialization() {
        let command = Command::from(PageCommand::CaptureScreenshot {
            format: "jpeg".to_string(),
            quality: Some(80),
        });
        let value = serde_json::to_value(&command).expect("serialize");
        assert_eq!(
            value,
            json!({
                "method": "Page.captureScreenshot",
                "params": { "format": "jpeg", "quality": 80 }
            })
        );
    }

    #[test]
    fn test_png_screenshot_omits_quality() {
        let command = PageCommand::CaptureScreenshot {
            format: "png".to_string(),
            quality: None,
        };
        let json = serde_json::to_string(&command).expect("serialize");
        assert!(!json.contains("quality"));
    }

    #[test]
    fn test_raw_command() {
        let command = Command::raw("Runtime.evaluate", Some(json!({ "expression": "1+1" })));
        assert_eq!(command.method(), "Runtime.evaluate");

        let value = serde_json::to_value(&command).expect("serialize");
        assert_eq!(value["params"]["expression"], "1+1");

        let bare = serde_json::to_value(Command::raw("Network.enable", None)).expect("serialize");
        assert!(bare.get("params").is_none());
    }

    #[test]
    fn test_method_names_match_wire() {
        let commands = [
            Command::from(BrowserCommand::GetVersion),
            Command::from(BrowserCommand::Close),
            Command::from(PageCommand::Enable),
            Command::from(PageCommand::Navigate {
                url: "https://example.com".to_string(),
            }),
            Command::from(PageCommand::Reload { ignore_cache: true }),
        ];

        for command in commands {
            let value = serde_json::to_value(&command).expect("serialize");
            assert_eq!(value["method"], command.method());
        }
    }
}
