//! wiescirolnicze.pl news scraper.
//!
//! The `td_module_10` listing shows headlines only, so every record has an
//! empty lead.

use super::{extract_listing, Fetcher, ListingSelectors};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use std::error::Error;
use url::Url;

pub const PAGE_URL: &str = "https://wiescirolnicze.pl/newsy/";

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://wiescirolnicze.pl").expect("valid base url"));
static RULES: Lazy<ListingSelectors> = Lazy::new(|| ListingSelectors::new("div.td_module_10", "h3.entry-title a", None));

#[derive(Debug, Clone, Copy, Default)]
pub struct WiesciRolnicze;

impl Fetcher for WiesciRolnicze {
    fn name(&self) -> &'static str {
        "wiescirolnicze.pl"
    }

    fn page_url(&self) -> &str {
        PAGE_URL
    }

    fn extract(&self, html: &str) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
        extract_listing(html, &RULES, &BASE)
    }
}
