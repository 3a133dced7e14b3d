//! Event shaping - turns a raw mail message into a normalized MessageEvent

use mail_parser::decoders::html::html_to_text;
use mail_parser::{Addr, Address, MessageParser};
use mailcast_common::types::{MessageEvent, EVENT_MESSAGE_APPEND};
use mailcast_common::{Error, Result};

/// Maximum snippet length in characters.
const SNIPPET_LENGTH: usize = 191;

/// Collapse whitespace runs to single spaces, trim, and cut to the
/// snippet limit on a character boundary.
pub fn plain_snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(SNIPPET_LENGTH).collect();
    truncated.trim_end().to_string()
}

/// Strip tags and normalize entities from an HTML body, then produce
/// a plain snippet from the remaining text.
pub fn html_snippet(html: &str) -> String {
    plain_snippet(&html_to_text(html))
}

fn collect_emails<'a>(addrs: &'a [Addr<'a>], out: &mut Vec<String>) {
    for addr in addrs {
        // Entries without an address are skipped rather than rejected.
        if let Some(email) = &addr.address {
            out.push(email.to_string());
        }
    }
}

/// Comma-join the email addresses in an address header, skipping
/// entries that carry no address. Never fails.
pub fn format_addresses(address: Option<&Address<'_>>) -> String {
    let mut emails = Vec::new();
    match address {
        Some(Address::List(list)) => collect_emails(list, &mut emails),
        Some(Address::Group(groups)) => {
            for group in groups {
                collect_emails(&group.addresses, &mut emails);
            }
        }
        None => {}
    }
    emails.join(",")
}

fn first_email(address: Option<&Address<'_>>) -> String {
    match address {
        Some(addr) => addr
            .first()
            .and_then(|a| a.address.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_default(),
        None => String::new(),
    }
}

/// Extract the Message-Id header with a case-insensitive scan.
///
/// Exactly one value yields that value; none yields an empty string;
/// more than one is rejected as ambiguous instead of silently picking
/// one.
fn message_id(msg: &mail_parser::Message<'_>) -> Result<String> {
    let mut values: Vec<&str> = Vec::new();
    for header in msg.headers() {
        if header.name().eq_ignore_ascii_case("Message-Id") {
            if let Some(value) = header.value().as_text() {
                values.push(value);
            }
        }
    }

    match values.as_slice() {
        [] => Ok(String::new()),
        [one] => Ok(one.to_string()),
        many => Err(Error::AmbiguousHeader(format!(
            "{} Message-Id headers present",
            many.len()
        ))),
    }
}

/// Shape one raw RFC 5322 message into a `MessageEvent`.
///
/// The HTML body is preferred for the snippet; a message with neither
/// body gets an empty snippet. An unparseable message still produces
/// an event carrying the identifiers, with empty metadata.
pub fn shape_event(
    user: &str,
    mailbox: &str,
    uid: u32,
    uidvalidity: u32,
    raw: &[u8],
) -> Result<MessageEvent> {
    let mut event = MessageEvent {
        user: user.to_string(),
        mailbox: mailbox.to_string(),
        uids: vec![uid],
        sender: String::new(),
        to: String::new(),
        event: EVENT_MESSAGE_APPEND.to_string(),
        event_timestamp: 0,
        uidvalidity,
        snippet: String::new(),
        subject: String::new(),
        msgid: String::new(),
    };

    let Some(msg) = MessageParser::default().parse(raw) else {
        return Ok(event);
    };

    event.sender = first_email(msg.from());
    event.to = format_addresses(msg.to());
    event.subject = msg.subject().unwrap_or_default().to_string();
    event.event_timestamp = msg.date().map(|d| d.to_timestamp()).unwrap_or(0);
    event.msgid = message_id(&msg)?;

    event.snippet = if !msg.html_body.is_empty() {
        html_snippet(&msg.body_html(0).unwrap_or_default())
    } else if !msg.text_body.is_empty() {
        plain_snippet(&msg.body_text(0).unwrap_or_default())
    } else {
        String::new()
    };

    Ok(event)
}
