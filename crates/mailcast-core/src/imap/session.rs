//! Short-lived IMAP session wrapper
//!
//! Sessions are opened and torn down per page fetch and per page-count
//! query so long folder scans never hit idle-session expiry.

use async_imap::types::Fetch;
use async_native_tls::{TlsConnector, TlsStream};
use futures::TryStreamExt;
use mailcast_common::config::ImapConfig;
use mailcast_common::{Error, Result};
use tokio::net::TcpStream;
use tracing::debug;

/// Folder state captured at SELECT time.
#[derive(Debug, Clone, Copy)]
pub struct SelectedFolder {
    /// Number of messages currently in the folder
    pub exists: u32,
    /// UIDVALIDITY of the folder, 0 when the server omits it
    pub uid_validity: u32,
}

/// One authenticated IMAPS session.
pub struct MailSession {
    session: async_imap::Session<TlsStream<TcpStream>>,
}

impl MailSession {
    /// Connect over TLS and log in.
    pub async fn open(config: &ImapConfig, email: &str, password: &str) -> Result<Self> {
        let tls = TlsConnector::new();
        let client = async_imap::connect(
            (config.host.as_str(), config.port),
            config.host.as_str(),
            tls,
        )
        .await
        .map_err(|e| Error::Transient(format!("IMAP connect to {} failed: {}", config.host, e)))?;

        let session = client
            .login(email, password)
            .await
            .map_err(|(e, _)| Error::Auth(format!("login rejected for {}: {}", email, e)))?;

        Ok(Self { session })
    }

    /// Select a folder, returning its message count and UIDVALIDITY.
    pub async fn select(&mut self, folder: &str) -> Result<SelectedFolder> {
        let mailbox = self
            .session
            .select(folder)
            .await
            .map_err(|e| Error::FolderNotFound(format!("{}: {}", folder, e)))?;

        Ok(SelectedFolder {
            exists: mailbox.exists,
            uid_validity: mailbox.uid_validity.unwrap_or(0),
        })
    }

    /// Fetch the messages with sequence numbers `start..=end`.
    ///
    /// Uses BODY.PEEK[] so the fetch leaves the \Seen flags untouched;
    /// harvesting must be side-effect-free on mailbox state.
    pub async fn fetch_range(&mut self, start: u32, end: u32) -> Result<Vec<Fetch>> {
        let sequence_set = format!("{}:{}", start, end);
        let stream = self
            .session
            .fetch(&sequence_set, "(UID BODY.PEEK[])")
            .await
            .map_err(|e| Error::Transient(format!("fetch {} failed: {}", sequence_set, e)))?;

        let messages: Vec<Fetch> = stream
            .try_collect()
            .await
            .map_err(|e| Error::Transient(format!("fetch {} failed: {}", sequence_set, e)))?;

        Ok(messages)
    }

    /// Log out, discarding errors; the session is gone either way.
    pub async fn close(mut self) {
        if let Err(e) = self.session.logout().await {
            debug!("IMAP logout failed: {}", e);
        }
    }
}
