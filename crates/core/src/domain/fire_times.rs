//! Firing-time metadata carried into jobs as a JSON header payload
//!
//! Some transports cannot carry typed timestamps in message headers, so the
//! four trigger timestamps travel as RFC 3339 text inside a small JSON object.
//! Absent timestamps are left out of the object entirely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Header names used for the encoded fire times
pub mod headers {
    pub const SCHEDULED: &str = "Jobwire-Scheduled";
    pub const SENT: &str = "Jobwire-Sent";
    pub const NEXT_SCHEDULED: &str = "Jobwire-NextScheduled";
    pub const PREVIOUS_SENT: &str = "Jobwire-PreviousSent";
}

/// Reserved job data entry holding the encoded fire times
pub const FIRE_TIMES_ENTRY: &str = "PayloadMessageHeadersAsJson";

/// Timestamps of a single trigger firing (all UTC, all optional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireTimes {
    /// When the trigger was scheduled to fire
    #[serde(
        rename = "Jobwire-Scheduled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled: Option<DateTime<Utc>>,

    /// When the trigger actually fired
    #[serde(rename = "Jobwire-Sent", default, skip_serializing_if = "Option::is_none")]
    pub fired: Option<DateTime<Utc>>,

    #[serde(
        rename = "Jobwire-NextScheduled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next: Option<DateTime<Utc>>,

    #[serde(
        rename = "Jobwire-PreviousSent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous: Option<DateTime<Utc>>,
}

impl FireTimes {
    /// Fire times for a trigger that fired exactly on schedule
    pub fn fired_at(at: DateTime<Utc>) -> Self {
        Self {
            scheduled: Some(at),
            fired: Some(at),
            ..Self::default()
        }
    }

    pub fn with_next(mut self, next: Option<DateTime<Utc>>) -> Self {
        self.next = next;
        self
    }

    pub fn with_previous(mut self, previous: Option<DateTime<Utc>>) -> Self {
        self.previous = previous;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_none()
            && self.fired.is_none()
            && self.next.is_none()
            && self.previous.is_none()
    }

    /// Encode as a JSON object of header name -> RFC 3339 text
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode text produced by [`FireTimes::encode`]
    pub fn decode(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Present timestamps as (header name, RFC 3339 text) pairs
    pub fn header_pairs(&self) -> Vec<(&'static str, String)> {
        [
            (headers::SCHEDULED, self.scheduled),
            (headers::SENT, self.fired),
            (headers::NEXT_SCHEDULED, self.next),
            (headers::PREVIOUS_SENT, self.previous),
        ]
        .into_iter()
        .filter_map(|(name, at)| {
            at.map(|t| (name, t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap() + chrono::Duration::nanoseconds(123_456_789)
    }

    #[test]
    fn test_empty_fire_times_encode_to_empty_object() {
        let encoded = FireTimes::default().encode().unwrap();
        assert_eq!(encoded, "{}");
    }

    #[test]
    fn test_absent_timestamps_are_omitted() {
        let times = FireTimes {
            scheduled: Some(sample_time()),
            ..FireTimes::default()
        };

        let encoded = times.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert!(object.contains_key(headers::SCHEDULED));
        assert!(!encoded.contains("null"));
    }

    #[test]
    fn test_round_trip_preserves_every_present_timestamp() {
        let t = sample_time();
        let times = FireTimes::fired_at(t)
            .with_next(Some(t + chrono::Duration::minutes(5)))
            .with_previous(Some(t - chrono::Duration::minutes(5)));

        let decoded = FireTimes::decode(&times.encode().unwrap()).unwrap();
        assert_eq!(decoded, times);
        assert_eq!(decoded.fired, Some(t));
    }

    #[test]
    fn test_encoded_values_are_text() {
        let times = FireTimes::fired_at(sample_time());
        let value: serde_json::Value = serde_json::from_str(&times.encode().unwrap()).unwrap();
        assert!(value[headers::SENT].is_string());
    }

    #[test]
    fn test_header_pairs_skip_absent_values() {
        let times = FireTimes {
            next: Some(sample_time()),
            ..FireTimes::default()
        };
        let pairs = times.header_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, headers::NEXT_SCHEDULED);
        assert!(pairs[0].1.ends_with('Z'));
    }
}
