//! Page calculation for folder listings

use super::session::MailSession;
use mailcast_common::config::ImapConfig;
use mailcast_common::Result;

/// Number of fixed-size pages needed to cover `total` messages.
pub fn pages_for(total: u32, page_size: u32) -> u32 {
    total.div_ceil(page_size)
}

/// Count the pages needed to cover every message currently in `folder`.
///
/// Opens one session per call and logs it out even when the select
/// fails. Fails with `Auth` on login and `FolderNotFound` on select.
pub async fn page_count(
    config: &ImapConfig,
    email: &str,
    password: &str,
    folder: &str,
    page_size: u32,
) -> Result<u32> {
    let mut session = MailSession::open(config, email, password).await?;
    let selected = session.select(folder).await;
    session.close().await;

    Ok(pages_for(selected?.exists, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pages_for_ceiling_division() {
        assert_eq!(pages_for(450, 200), 3);
        // An exact multiple must not double the quotient.
        assert_eq!(pages_for(400, 200), 2);
        assert_eq!(pages_for(0, 200), 0);
        assert_eq!(pages_for(1, 200), 1);
        assert_eq!(pages_for(200, 200), 1);
        assert_eq!(pages_for(201, 200), 2);
    }

    #[test]
    fn test_pages_for_matches_ceil() {
        for total in 0..1000u32 {
            for page_size in [1, 2, 3, 7, 200] {
                let expected = (total as f64 / page_size as f64).ceil() as u32;
                assert_eq!(pages_for(total, page_size), expected);
            }
        }
    }
}
