//! Event message types.
//!
//! Events are notifications sent from the remote end to the local end
//! when browser activity occurs. They carry no correlation ID.
//!
//! # Event Names
//!
//! | Domain | Events |
//! |--------|--------|
//! | `Page` | `loadEventFired`, `domContentEventFired`, `frameNavigated`, `frameStartedLoading`, `frameStoppedLoading`, `javascriptDialogOpening` |
//! | `Inspector` | `detached`, `targetCrashed` |
//! | `Target` | `targetCreated`, `targetDestroyed`, `targetCrashed` |
//!
//! Names outside this set are carried as [`EventName::Other`].

// ============================================================================
// Imports
// ============================================================================

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Event
// ============================================================================

/// An event notification from remote end to local end.
///
/// # Format
///
/// ```json
/// {
///   "method": "Domain.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event name in `Domain.eventName` format.
    pub method: String,

    /// Event-specific data (`null` when absent).
    #[serde(default)]
    pub params: Value,
}

impl Event {
    /// Returns the domain name from the method.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let event = Event { method: "Page.loadEventFired".into(), .. };
    /// assert_eq!(event.domain(), "Page");
    /// ```
    #[inline]
    #[must_use]
    pub fn domain(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }

    /// Returns the typed event name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> EventName {
        EventName::from(self.method.as_str())
    }
}

// ============================================================================
// EventName
// ============================================================================

/// Known event names, plus an escape hatch for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventName {
    /// `Page.loadEventFired`
    PageLoadEventFired,
    /// `Page.domContentEventFired`
    PageDomContentEventFired,
    /// `Page.frameNavigated`
    PageFrameNavigated,
    /// `Page.frameStartedLoading`
    PageFrameStartedLoading,
    /// `Page.frameStoppedLoading`
    PageFrameStoppedLoading,
    /// `Page.javascriptDialogOpening`
    PageJavascriptDialogOpening,
    /// `Inspector.detached`
    InspectorDetached,
    /// `Inspector.targetCrashed`
    InspectorTargetCrashed,
    /// `Target.targetCreated`
    TargetCreated,
    /// `Target.targetDestroyed`
    TargetDestroyed,
    /// `Target.targetCrashed`
    TargetCrashed,
    /// Any other `Domain.eventName`.
    Other(String),
}

impl EventName {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PageLoadEventFired => "Page.loadEventFired",
            Self::PageDomContentEventFired => "Page.domContentEventFired",
            Self::PageFrameNavigated => "Page.frameNavigated",
            Self::PageFrameStartedLoading => "Page.frameStartedLoading",
            Self::PageFrameStoppedLoading => "Page.frameStoppedLoading",
            Self::PageJavascriptDialogOpening => "Page.javascriptDialogOpening",
            Self::InspectorDetached => "Inspector.detached",
            Self::InspectorTargetCrashed => "Inspector.targetCrashed",
            Self::TargetCreated => "Target.targetCreated",
            Self::TargetDestroyed => "Target.targetDestroyed",
            Self::TargetCrashed => "Target.targetCrashed",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        match name {
            "Page.loadEventFired" => Self::PageLoadEventFired,
            "Page.domContentEventFired" => Self::PageDomContentEventFired,
            "Page.frameNavigated" => Self::PageFrameNavigated,
            "Page.frameStartedLoading" => Self::PageFrameStartedLoading,
            "Page.frameStoppedLoading" => Self::PageFrameStoppedLoading,
            "Page.javascriptDialogOpening" => Self::PageJavascriptDialogOpening,
            "Inspector.detached" => Self::InspectorDetached,
            "Inspector.targetCrashed" => Self::InspectorTargetCrashed,
            "Target.targetCreated" => Self::TargetCreated,
            "Target.targetDestroyed" => Self::TargetDestroyed,
            "Target.targetCrashed" => Self::TargetCrashed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EventName {
    #[inline]
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl FromStr for EventName {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
