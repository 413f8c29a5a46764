//! Wire tracing.
//!
//! Every outbound write and inbound receipt can be observed by a
//! [`TraceSink`], enabled separately per [`Direction`]. Long string fields
//! (base64 screenshots, page sources) are cut down before they reach the
//! sink; the payload routed to callers is never modified.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

// ============================================================================
// Constants
// ============================================================================

/// Default cap on traced string length, in characters.
pub const DEFAULT_MAX_STRING_LEN: usize = 100;

// ============================================================================
// Direction
// ============================================================================

/// Which way a traced message travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Local → remote.
    Send,
    /// Remote → local.
    Receive,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send => f.write_str("send"),
            Self::Receive => f.write_str("receive"),
        }
    }
}

// ============================================================================
// TraceSink
// ============================================================================

/// Receives traced wire messages.
pub trait TraceSink: Send + Sync {
    /// Records one message. `payload` is already truncated.
    fn record(&self, direction: Direction, payload: &Value);
}

/// Default sink: `debug` events on the `cdp_client::wire` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, direction: Direction, payload: &Value) {
        debug!(target: "cdp_client::wire", %direction, %payload, "wire message");
    }
}

// ============================================================================
// TraceConfig
// ============================================================================

/// Per-direction tracing switches and truncation policy.
#[derive(Clone)]
pub struct TraceConfig {
    /// Trace outbound requests.
    pub send: bool,
    /// Trace inbound responses and events.
    pub receive: bool,
    /// Strings longer than this many characters are truncated.
    pub max_string_len: usize,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for TraceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceConfig")
            .field("send", &self.send)
            .field("receive", &self.receive)
            .field("max_string_len", &self.max_string_len)
            .finish_non_exhaustive()
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

impl TraceConfig {
    /// Tracing off in both directions.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            send: false,
            receive: false,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            sink: Arc::new(TracingSink),
        }
    }

    /// Tracing on in both directions.
    #[must_use]
    pub fn all() -> Self {
        Self::disabled().with_send(true).with_receive(true)
    }

    /// Enables or disables outbound tracing.
    #[inline]
    #[must_use]
    pub fn with_send(mut self, enabled: bool) -> Self {
        self.send = enabled;
        self
    }

    /// Enables or disables inbound tracing.
    #[inline]
    #[must_use]
    pub fn with_receive(mut self, enabled: bool) -> Self {
        self.receive = enabled;
        self
    }

    /// Sets the truncation threshold.
    #[inline]
    #[must_use]
    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    /// Replaces the sink.
    #[inline]
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns `true` if `direction` is traced.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Send => self.send,
            Direction::Receive => self.receive,
        }
    }

    /// Hands a truncated copy of `payload` to the sink if `direction` is on.
    pub(crate) fn observe(&self, direction: Direction, payload: &Value) {
        if self.is_enabled(direction) {
            let truncated = truncate_strings(payload, self.max_string_len);
            self.sink.record(direction, &truncated);
        }
    }
}

// ============================================================================
// Truncation
// ============================================================================

/// Returns a copy of `value` with every long string shortened.
///
/// A string over `max_len` characters becomes its first `max_len`
/// characters followed by `... (truncated, original length N)`.
#[must_use]
pub fn truncate_strings(value: &Value, max_len: usize) -> Value {
    match value {
        Value::String(s) => Value::String(truncate_str(s, max_len)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| truncate_strings(item, max_len))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, item)| (key.clone(), truncate_strings(item, max_len)))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    let length = s.chars().count();
    if length <= max_len {
        return s.to_string();
    }

    let prefix: String = s.chars().take(max_len).collect();
    format!("{prefix}... (truncated, original length {length})")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<(Direction, Value)>>,
    }

    impl TraceSink for RecordingSink {
        fn record(&self, direction: Direction, payload: &Value) {
            self.records.lock().push((direction, payload.clone()));
        }
    }

    #[test]
    fn test_short_strings_untouched() {
        let value = json!({ "method": "Page.enable", "params": { "n": 1, "ok": true } });
        assert_eq!(truncate_strings(&value, 100), value);
    }

    #[test]
    fn test_long_string_truncated_with_marker() {
        let data = "A".repeat(250);
        let value = json!({ "id": 4, "result": { "data": data } });

        let truncated = truncate_strings(&value, 100);
        let expected = format!("{}... (truncated, original length 250)", "A".repeat(100));
        assert_eq!(truncated["result"]["data"], expected);
        assert_eq!(truncated["id"], 4);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let s = "é".repeat(5);
        assert_eq!(
            truncate_str(&s, 2),
            "éé... (truncated, original length 5)"
        );
    }

    #[test]
    fn test_arrays_are_walked() {
        let value = json!(["short", "x".repeat(11)]);
        let truncated = truncate_strings(&value, 10);
        assert_eq!(truncated[0], "short");
        assert!(truncated[1].as_str().expect("string").ends_with("original length 11)"));
    }

    #[test]
    fn test_observe_respects_direction_switches() {
        let sink = Arc::new(RecordingSink::default());
        let config = TraceConfig::disabled()
            .with_receive(true)
            .with_max_string_len(3)
            .with_sink(sink.clone());

        let payload = json!({ "data": "abcdef" });
        config.observe(Direction::Send, &payload);
        config.observe(Direction::Receive, &payload);

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, Direction::Receive);
        assert_eq!(records[0].1["data"], "abc... (truncated, original length 6)");
        // the caller's copy is unchanged
        assert_eq!(payload["data"], "abcdef");
    }

    #[test]
    fn test_default_is_disabled() {
        let config = TraceConfig::default();
        assert!(!config.is_enabled(Direction::Send));
        assert!(!config.is_enabled(Direction::Receive));
        assert_eq!(config.max_string_len, DEFAULT_MAX_STRING_LEN);
        assert!(TraceConfig::all().is_enabled(Direction::Send));
    }

    proptest! {
        #[test]
        fn prop_truncated_strings_are_bounded(s in ".{0,300}", max_len in 0usize..150) {
            let out = truncate_str(&s, max_len);
            let length = s.chars().count();
            if length <= max_len {
                prop_assert_eq!(out, s);
            } else {
                prop_assert!(out.starts_with(&s.chars().take(max_len).collect::<String>()));
                let suffix = format!("... (truncated, original length {length})");
                prop_assert!(out.ends_with(&suffix));
            }
        }
    }
}
