//! Common types for Mailcast

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Event type literal carried by every message event.
pub const EVENT_MESSAGE_APPEND: &str = "MessageAppend";

/// One mail account to harvest, read once at the start of a run.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub folders: Vec<String>,
}

// Credentials end up in logs through task error paths, so keep the
// password out of the Debug rendering.
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("folders", &self.folders)
            .finish()
    }
}

/// Load the account list from a JSON file.
///
/// The file holds a single JSON array of account objects:
/// `[{"email": "...", "password": "...", "folders": ["INBOX", ...]}, ...]`
pub fn load_accounts(path: &Path) -> crate::Result<Vec<Account>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::Error::Config(format!("Failed to read accounts file: {}", e)))?;

    let accounts: Vec<Account> = serde_json::from_str(&content)
        .map_err(|e| crate::Error::Config(format!("Failed to parse accounts file: {}", e)))?;

    Ok(accounts)
}

/// Normalized event for one appended mail message.
///
/// This is the broker payload: one instance per message, created fresh
/// by the fetcher, handed to the publisher, and never persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Account email the message belongs to
    pub user: String,

    /// Folder the message was found in
    pub mailbox: String,

    /// Provider message identifiers; exactly one element per event
    pub uids: Vec<u32>,

    /// Sender address, empty when unresolvable
    pub sender: String,

    /// Comma-joined recipient addresses, empty when none resolvable
    pub to: String,

    /// Fixed event type literal
    pub event: String,

    /// Unix timestamp from the message's Date header, 0 when absent
    pub event_timestamp: i64,

    /// UIDVALIDITY of the folder at fetch time
    pub uidvalidity: u32,

    /// Whitespace-collapsed body preview, at most 191 characters
    pub snippet: String,

    /// Subject line, empty when absent
    pub subject: String,

    /// Message-Id header value, empty when absent
    pub msgid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_accounts() {
        let json = r#"[
            {"email": "a@example.com", "password": "s3cret", "folders": ["INBOX", "Sent"]},
            {"email": "b@example.com", "password": "hunter2", "folders": ["INBOX"]}
        ]"#;

        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].email, "a@example.com");
        assert_eq!(accounts[0].folders, vec!["INBOX", "Sent"]);
    }

    #[test]
    fn test_account_debug_redacts_password() {
        let account = Account {
            email: "a@example.com".to_string(),
            password: "s3cret".to_string(),
            folders: vec!["INBOX".to_string()],
        };

        let rendered = format!("{:?}", account);
        assert!(rendered.contains("a@example.com"));
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_message_event_round_trip() {
        let event = MessageEvent {
            user: "a@example.com".to_string(),
            mailbox: "INBOX".to_string(),
            uids: vec![42],
            sender: "b@example.com".to_string(),
            to: "a@example.com,c@example.com".to_string(),
            event: EVENT_MESSAGE_APPEND.to_string(),
            event_timestamp: 1_700_000_000,
            uidvalidity: 7,
            snippet: "hello world".to_string(),
            subject: "greetings".to_string(),
            msgid: "<abc@example.com>".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let decoded: MessageEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.event, "MessageAppend");
    }
}
