//! Protocol and browser version types.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

// ============================================================================
// ProtocolVersion
// ============================================================================

/// A parsed `major.minor` DevTools protocol version.
///
/// Ordering compares `major` first, then `minor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ProtocolVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
}

impl ProtocolVersion {
    /// Version assumed when the remote cannot report one.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a version from its components.
    #[inline]
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Returns `true` if `self` is at least `required`.
    #[inline]
    #[must_use]
    pub fn satisfies(&self, required: &Self) -> bool {
        self.major > required.major
            || (self.major == required.major && self.minor >= required.minor)
    }
}

impl FromStr for ProtocolVersion {
    type Err = Error;

    /// Parses `"major.minor"`, e.g. `"1.3"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::invalid_argument(format!("invalid protocol version: {s:?}"));

        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self::new(major, minor))
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// ============================================================================
// BrowserVersion
// ============================================================================

/// Result of `Browser.getVersion`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrowserVersion {
    /// Protocol version string, e.g. `"1.3"`.
    pub protocol_version: String,
    /// Product name, e.g. `"HeadlessChrome/120.0.6099.109"`.
    pub product: String,
    /// Product revision.
    pub revision: String,
    /// User agent.
    pub user_agent: String,
    /// V8 version.
    pub js_version: String,
}

impl BrowserVersion {
    /// Parses the reported protocol version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the field is not `major.minor`.
    pub fn protocol(&self) -> Result<ProtocolVersion> {
        self.protocol_version.parse()
    }
}

// ============================================================================
// Tests
// ============================================================================
