//! Thin HTTP fetch of puzzle pages.
//!
//! One GET per target, no retries, no authentication; the page URL is the
//! crossword type and ISO date under the puzzles section.

use chrono::NaiveDate;
use exn::ResultExt;
use gridfetch_plan::CrosswordType;
use tracing::debug;

use crate::error::{ErrorKind, Result};

const BASE_URL: &str = "https://www.smh.com.au/puzzles/crosswords";

pub fn client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("gridfetch/", env!("CARGO_PKG_VERSION")))
        .build()
        .or_raise(|| ErrorKind::Client)
}

pub fn page_url(kind: CrosswordType, date: NaiveDate) -> String {
    format!("{BASE_URL}/{kind}/{date}")
}

/// Downloads one puzzle page, failing on any non-success status.
pub async fn page(client: &reqwest::Client, kind: CrosswordType, date: NaiveDate) -> Result<String> {
    let url = page_url(kind, date);
    debug!(%url, "fetching puzzle page");
    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .or_raise(|| ErrorKind::Fetch { url: url.clone() })?;
    response.text().await.or_raise(|| ErrorKind::Fetch { url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_type_then_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(
            page_url(CrosswordType::Cryptic, date),
            "https://www.smh.com.au/puzzles/crosswords/cryptic/2025-02-01"
        );
    }
}
