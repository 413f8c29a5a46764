//! Type-safe identifiers.
//!
//! Newtype wrappers prevent mixing request IDs with other integers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

// ============================================================================
// RequestId
// ============================================================================

/// Correlation ID linking an outbound command to its response.
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Creates a request ID from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ============================================================================
// RequestIdSequence
// ============================================================================

/// Allocates strictly increasing request IDs starting at 1.
///
/// Safe to share between tasks; concurrent callers never observe a
/// duplicate or a gap.
#[derive(Debug)]
pub struct RequestIdSequence {
    next: AtomicU64,
}

impl RequestIdSequence {
    /// Creates a sequence whose first ID is 1.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns the next ID. IDs are never reused.
    #[inline]
    pub fn next_id(&self) -> RequestId {
        RequestId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns how many IDs have been handed out.
    #[inline]
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for RequestIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
