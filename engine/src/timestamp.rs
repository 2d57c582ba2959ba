//! Wall-clock timestamps with nanosecond precision.
//!
//! Timestamps order document versions and stamp local server-timestamp
//! estimates. The ordering is total: seconds first, then nanoseconds.

use serde::{Deserialize, Serialize};

/// A point in time as seconds since the Unix epoch plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamp {
    /// Seconds since the Unix epoch (may be negative)
    pub seconds: i64,
    /// Nanoseconds within the second, 0..1_000_000_000
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp from seconds and nanoseconds.
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Create a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanos: (millis.rem_euclid(1000) as u32) * 1_000_000,
        }
    }

    /// Convert to milliseconds since the Unix epoch, truncating sub-millisecond
    /// precision.
    pub fn to_millis(self) -> i64 {
        self.seconds * 1000 + i64::from(self.nanos / 1_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_by_seconds_then_nanos() {
        let a = Timestamp::new(1, 999_999_999);
        let b = Timestamp::new(2, 0);
        let c = Timestamp::new(2, 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn millis_roundtrip() {
        let ts = Timestamp::from_millis(1_706_745_600_123);
        assert_eq!(ts.seconds, 1_706_745_600);
        assert_eq!(ts.nanos, 123_000_000);
        assert_eq!(ts.to_millis(), 1_706_745_600_123);
    }

    #[test]
    fn negative_millis() {
        let ts = Timestamp::from_millis(-1);
        assert_eq!(ts.seconds, -1);
        assert_eq!(ts.nanos, 999_000_000);
        assert_eq!(ts.to_millis(), -1);
    }

    #[test]
    fn serialization_format() {
        let ts = Timestamp::new(10, 20);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, r#"{"seconds":10,"nanos":20}"#);

        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
