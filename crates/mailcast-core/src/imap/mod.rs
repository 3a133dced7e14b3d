//! IMAP client - short-lived sessions, page calculation, event fetching

mod fetcher;
mod pages;
mod session;
mod source;

pub use fetcher::fetch_events;
pub use pages::{page_count, pages_for};
pub use session::{MailSession, SelectedFolder};
pub use source::{ImapSource, MailSource};
