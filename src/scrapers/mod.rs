//! Listing-page scrapers for agricultural news sites.
//!
//! Each site is one [`Fetcher`] implementation. A fetch is a single GET of the
//! site's listing page followed by [`Fetcher::extract`]; there is no
//! pagination and no per-article download.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing page |
//! |--------|--------|--------------|
//! | farmer.pl | [`farmer`] | `https://www.farmer.pl/` |
//! | agrarheute | [`agrarheute`] | `https://www.agrarheute.com/` |
//! | cenyrolnicze.pl | [`cenyrolnicze`] | `https://www.cenyrolnicze.pl/wiadomosci` |
//! | wiescirolnicze.pl | [`wiescirolnicze`] | `https://wiescirolnicze.pl/newsy/` |
//!
//! Errors are not isolated per source: an unreachable page or a title without
//! an `href` aborts the whole collection step. A page served with an error
//! status is parsed like any other and normally yields no teasers.

use crate::loader::PageLoader;
use crate::models::ArticleRecord;
use crate::utils::normalize_whitespace;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument};
use url::Url;

pub mod agrarheute;
pub mod cenyrolnicze;
pub mod farmer;
pub mod wiescirolnicze;

/// A site-specific extractor of teasers from one listing page.
pub trait Fetcher {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The listing page to download.
    fn page_url(&self) -> &str;

    /// Turn the listing page markup into records, in document order.
    fn extract(&self, html: &str) -> Result<Vec<ArticleRecord>, Box<dyn Error>>;
}

/// CSS rules shared by the listing layouts.
///
/// `lead` is `None` for sites whose listing shows headlines only.
pub struct ListingSelectors {
    pub entry: Selector,
    pub title: Selector,
    pub lead: Option<Selector>,
}

impl ListingSelectors {
    /// Parse the rule set; panics on an invalid selector literal.
    pub fn new(entry: &str, title: &str, lead: Option<&str>) -> Self {
        let parse = |s: &str| Selector::parse(s).unwrap_or_else(|e| panic!("invalid selector {s:?}: {e}"));
        Self {
            entry: parse(entry),
            title: parse(title),
            lead: lead.map(parse),
        }
    }
}

/// Extract teasers from a listing document.
///
/// Entries without a title element are skipped. The title element's `href` is
/// resolved against `base`, so relative and absolute links both come out
/// absolute.
pub fn extract_listing(
    html: &str,
    rules: &ListingSelectors,
    base: &Url,
) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for entry in document.select(&rules.entry) {
        let Some(title_el) = entry.select(&rules.title).next() else {
            debug!("Skipping entry without title");
            continue;
        };
        let title = element_text(&title_el);
        let href = title_el
            .value()
            .attr("href")
            .ok_or_else(|| format!("title {title:?} has no href"))?;
        let link = base.join(href)?;

        let lead = rules
            .lead
            .as_ref()
            .and_then(|sel| entry.select(sel).next())
            .map(|el| element_text(&el))
            .unwrap_or_default();

        records.push(ArticleRecord::new(title, lead, link.to_string()));
    }

    Ok(records)
}

fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Download one listing page and extract its teasers.
#[instrument(level = "info", skip_all, fields(source = fetcher.name()))]
pub async fn fetch<L: PageLoader>(
    fetcher: &dyn Fetcher,
    loader: &L,
) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let html = loader.load(fetcher.page_url()).await?;
    let records = fetcher.extract(&html)?;
    info!(count = records.len(), url = fetcher.page_url(), "Extracted teasers");
    Ok(records)
}

/// Run every fetcher in order and concatenate their records.
///
/// The first failing fetcher aborts the collection.
pub async fn fetch_all<L: PageLoader>(
    fetchers: &[Box<dyn Fetcher>],
    loader: &L,
) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
    let mut all = Vec::new();
    for fetcher in fetchers {
        all.extend(fetch(fetcher.as_ref(), loader).await?);
    }
    info!(count = all.len(), sources = fetchers.len(), "Collected teasers from all sources");
    Ok(all)
}

/// The stock sources in publication order.
pub fn default_fetchers() -> Vec<Box<dyn Fetcher>> {
    vec![
        Box::new(farmer::FarmerPl),
        Box::new(agrarheute::Agrarheute),
        Box::new(cenyrolnicze::CenyRolnicze),
        Box::new(wiescirolnicze::WiesciRolnicze),
    ]
}
