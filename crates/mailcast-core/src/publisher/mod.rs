//! Event publishing - envelope shaping and the broker client

mod kafka;

pub use kafka::KafkaPublisher;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailcast_common::Result;
use serde::{Deserialize, Serialize};

/// Outer wrapper sent to the broker, distinct from the event payload.
///
/// `issued_at` is the instant of the publish call, not the message's
/// own mail timestamp; chrono's serde renders it as an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishEnvelope {
    pub event_type: String,
    pub payload: serde_json::Value,
    pub issued_at: DateTime<Utc>,
}

/// Something that can publish one event as one keyed broker message.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` under `event_type`, keyed by `key`.
    ///
    /// Returns only once the broker has acknowledged the message.
    async fn publish(&self, event_type: &str, key: &str, payload: serde_json::Value)
        -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_round_trip() {
        let envelope = PublishEnvelope {
            event_type: "MessageAppend".to_string(),
            payload: serde_json::json!({"user": "a@example.com", "uids": [42]}),
            issued_at: Utc::now(),
        };

        let json = serde_json::to_string(&envelope).unwrap();
        let decoded: PublishEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_envelope_timestamp_is_iso8601_string() {
        let issued_at = "2023-11-14T08:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let envelope = PublishEnvelope {
            event_type: "MessageAppend".to_string(),
            payload: serde_json::Value::Null,
            issued_at,
        };

        let value = serde_json::to_value(&envelope).unwrap();
        let rendered = value["issued_at"].as_str().expect("issued_at is a string");
        assert!(rendered.starts_with("2023-11-14T08:30:00"));
        assert_eq!(rendered.parse::<DateTime<Utc>>().unwrap(), issued_at);
    }
}
