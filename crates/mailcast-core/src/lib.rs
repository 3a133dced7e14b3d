//! Mailcast Core - IMAP harvesting and event publishing
//!
//! This crate provides the ingestion pipeline: paginated IMAP fetching,
//! event shaping, retry supervision, Kafka publishing, and the
//! three-level concurrent fan-out that drives a run.

pub mod event;
pub mod imap;
pub mod notify;
pub mod pipeline;
pub mod publisher;
pub mod retry;

pub use imap::{fetch_events, page_count, ImapSource, MailSource};
pub use notify::TelegramNotifier;
pub use pipeline::PipelineRunner;
pub use publisher::{KafkaPublisher, Publisher};
pub use retry::{with_retry, RetryPolicy};
