//! Mailbox source seam

use super::{fetch_events, page_count};
use async_trait::async_trait;
use mailcast_common::config::ImapConfig;
use mailcast_common::types::MessageEvent;
use mailcast_common::Result;

/// Source of folder page counts and shaped message events.
///
/// The pipeline reaches mailboxes only through this trait; the
/// production binding opens real IMAP sessions.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Pages needed to cover every message currently in `folder`
    async fn page_count(
        &self,
        email: &str,
        password: &str,
        folder: &str,
        page_size: u32,
    ) -> Result<u32>;

    /// Fetch the given pages of `folder` as shaped events
    async fn fetch_events(
        &self,
        email: &str,
        password: &str,
        folder: &str,
        pages: &[u32],
        page_size: u32,
    ) -> Result<Vec<MessageEvent>>;
}

/// IMAP-backed mail source for one mail host.
pub struct ImapSource {
    config: ImapConfig,
}

impl ImapSource {
    /// Create a source for the configured host
    pub fn new(config: ImapConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailSource for ImapSource {
    async fn page_count(
        &self,
        email: &str,
        password: &str,
        folder: &str,
        page_size: u32,
    ) -> Result<u32> {
        page_count(&self.config, email, password, folder, page_size).await
    }

    async fn fetch_events(
        &self,
        email: &str,
        password: &str,
        folder: &str,
        pages: &[u32],
        page_size: u32,
    ) -> Result<Vec<MessageEvent>> {
        fetch_events(&self.config, email, password, folder, pages, page_size).await
    }
}
