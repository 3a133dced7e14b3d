//! Kafka publisher
//!
//! Owns the single producer for a run. Sending awaits the broker's
//! delivery acknowledgment before returning, trading throughput for
//! the guarantee that a successful publish is on the broker.

use super::{PublishEnvelope, Publisher};
use crate::retry::{with_retry, RetryPolicy};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use mailcast_common::config::KafkaConfig;
use mailcast_common::{Error, Result};
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{debug, info};

/// Translate the publisher configuration into an rdkafka client config.
///
/// SASL parameters are only applied when a security protocol is set, so
/// plaintext and authenticated brokers work behind the same interface.
fn build_client_config(config: &KafkaConfig) -> ClientConfig {
    let mut client_config = ClientConfig::new();
    client_config
        .set("bootstrap.servers", config.bootstrap_servers.join(","))
        .set("acks", &config.acks)
        .set("message.timeout.ms", config.message_timeout_ms.to_string());

    if let Some(protocol) = &config.security_protocol {
        client_config.set("security.protocol", protocol);
        if let Some(mechanism) = &config.sasl_mechanism {
            client_config.set("sasl.mechanism", mechanism);
        }
        if let Some(username) = &config.sasl_username {
            client_config.set("sasl.username", username);
        }
        if let Some(password) = &config.sasl_password {
            client_config.set("sasl.password", password);
        }
    }

    client_config
}

/// Kafka-backed publisher. One instance, and one underlying producer,
/// is created per run and shared by every concurrent publish call (the
/// producer is internally thread-safe).
pub struct KafkaPublisher {
    config: KafkaConfig,
    policy: RetryPolicy,
    producer: FutureProducer,
}

impl KafkaPublisher {
    /// Build the producer and verify the broker answers a metadata
    /// request, retrying per the configured policy. Exhaustion surfaces
    /// as `BrokerUnavailable`.
    pub async fn connect(config: KafkaConfig) -> Result<Self> {
        let policy = RetryPolicy::new(Duration::from_secs(config.delay_secs), config.retries);

        let producer = with_retry(&policy, "kafka connect", || {
            let config = config.clone();
            async move {
                info!("Connecting to {}", config.bootstrap_servers.join(","));
                let producer: FutureProducer = build_client_config(&config)
                    .create()
                    .map_err(|e| Error::Transient(format!("creating producer: {}", e)))?;

                // Metadata fetch proves the bootstrap servers are reachable;
                // creating a producer alone never touches the network.
                let probe = producer.clone();
                let topic = config.topic.clone();
                tokio::task::spawn_blocking(move || {
                    probe
                        .client()
                        .fetch_metadata(Some(&topic), Duration::from_secs(10))
                })
                .await
                .map_err(|e| Error::Other(anyhow!("metadata probe task failed: {}", e)))?
                .map_err(|e| Error::Transient(format!("broker metadata fetch: {}", e)))?;

                Ok(producer)
            }
        })
        .await
        .map_err(|e| Error::BrokerUnavailable(e.to_string()))?;

        Ok(Self {
            config,
            policy,
            producer,
        })
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(
        &self,
        event_type: &str,
        key: &str,
        payload: serde_json::Value,
    ) -> Result<()> {
        // The envelope is stamped once per publish call, not per attempt.
        let envelope = PublishEnvelope {
            event_type: event_type.to_string(),
            payload,
            issued_at: Utc::now(),
        };
        let body = serde_json::to_vec(&envelope)
            .map_err(|e| Error::Other(anyhow!("serializing envelope: {}", e)))?;

        debug!("Publishing {} event keyed by {}", envelope.event_type, key);

        let queue_timeout = Timeout::After(Duration::from_millis(self.config.message_timeout_ms));

        with_retry(&self.policy, "kafka publish", || {
            let body = &body;
            async move {
                let record = FutureRecord::to(&self.config.topic)
                    .key(key.as_bytes())
                    .payload(body.as_slice());

                // Awaiting the delivery future is the send-then-flush:
                // it resolves only once the broker has acknowledged.
                self.producer
                    .send(record, queue_timeout)
                    .await
                    .map_err(|(e, _)| Error::Transient(format!("delivery failed: {}", e)))?;

                Ok(())
            }
        })
        .await
        .map_err(|e| match e {
            Error::Transient(msg) => Error::Publish(format!("key {}: {}", key, msg)),
            other => other,
        })
    }
}
