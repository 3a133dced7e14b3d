//! Event fetcher - retrieves message pages and shapes them into events

use super::session::MailSession;
use crate::event::shape_event;
use mailcast_common::config::ImapConfig;
use mailcast_common::types::MessageEvent;
use mailcast_common::Result;
use tracing::{debug, warn};

/// Fetch the given pages of `folder` and shape each message into a
/// `MessageEvent`.
///
/// Pages are processed in the order given; within a page, events follow
/// the server's listing order. One short-lived session is opened per
/// page and logged out again whether the page succeeded or not. A page
/// index past the end of the folder yields no events (mailboxes mutate
/// between the page count and the read).
pub async fn fetch_events(
    config: &ImapConfig,
    email: &str,
    password: &str,
    folder: &str,
    pages: &[u32],
    page_size: u32,
) -> Result<Vec<MessageEvent>> {
    let mut events = Vec::new();

    for &page in pages {
        let mut session = MailSession::open(config, email, password).await?;
        let page_events = harvest_page(&mut session, email, folder, page, page_size).await;
        session.close().await;
        events.extend(page_events?);
    }

    Ok(events)
}

async fn harvest_page(
    session: &mut MailSession,
    email: &str,
    folder: &str,
    page: u32,
    page_size: u32,
) -> Result<Vec<MessageEvent>> {
    let selected = session.select(folder).await?;

    // Sequence numbers are 1-based: page i covers [i*size+1, (i+1)*size].
    let start = page * page_size + 1;
    let end = ((page + 1) * page_size).min(selected.exists);
    if start > selected.exists {
        debug!(
            "page {} of {} is past the end ({} messages), skipping",
            page, folder, selected.exists
        );
        return Ok(Vec::new());
    }

    let mut events = Vec::new();
    let fetches = session.fetch_range(start, end).await?;
    for fetch in &fetches {
        let Some(uid) = fetch.uid else {
            warn!("message {} in {} has no UID, skipping", fetch.message, folder);
            continue;
        };
        let raw = fetch.body().unwrap_or_default();
        events.push(shape_event(email, folder, uid, selected.uid_validity, raw)?);
    }

    Ok(events)
}
