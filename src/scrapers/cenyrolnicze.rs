//! cenyrolnicze.pl news scraper.
//!
//! The news page is a K2 listing; only the "leading" items are scraped. Links
//! are usually absolute already.

use super::{extract_listing, Fetcher, ListingSelectors};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use std::error::Error;
use url::Url;

pub const PAGE_URL: &str = "https://www.cenyrolnicze.pl/wiadomosci";

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.cenyrolnicze.pl").expect("valid base url"));
static RULES: Lazy<ListingSelectors> = Lazy::new(|| {
    ListingSelectors::new(
        ".items-leading .catItemBody",
        ".catItemTitle a",
        Some(".catItemIntroText"),
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct CenyRolnicze;

impl Fetcher for CenyRolnicze {
    fn name(&self) -> &'static str {
        "cenyrolnicze.pl"
    }

    fn page_url(&self) -> &str {
        PAGE_URL
    }

    fn extract(&self, html: &str) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
        extract_listing(html, &RULES, &BASE)
    }
}
