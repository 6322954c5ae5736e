//! agrarheute.com teaser scraper.
//!
//! Teasers are `<article class="teaser">` blocks; the headline anchor sits in
//! `.teaser__title` and links are site-relative.

use super::{extract_listing, Fetcher, ListingSelectors};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use std::error::Error;
use url::Url;

pub const PAGE_URL: &str = "https://www.agrarheute.com/";

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.agrarheute.com").expect("valid base url"));
static RULES: Lazy<ListingSelectors> =
    Lazy::new(|| ListingSelectors::new("article.teaser", ".teaser__title a", Some(".teaser__intro")));

#[derive(Debug, Clone, Copy, Default)]
pub struct Agrarheute;

impl Fetcher for Agrarheute {
    fn name(&self) -> &'static str {
        "agrarheute"
    }

    fn page_url(&self) -> &str {
        PAGE_URL
    }

    fn extract(&self, html: &str) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
        extract_listing(html, &RULES, &BASE)
    }
}
