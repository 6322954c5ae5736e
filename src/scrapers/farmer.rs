//! farmer.pl teaser scraper.
//!
//! The homepage lists articles as `.article-box` cards inside `.listing`. The
//! headline element is itself the anchor and carries a site-relative `href`.

use super::{extract_listing, Fetcher, ListingSelectors};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use std::error::Error;
use url::Url;

pub const PAGE_URL: &str = "https://www.farmer.pl/";

static BASE: Lazy<Url> = Lazy::new(|| Url::parse("https://www.farmer.pl").expect("valid base url"));
static RULES: Lazy<ListingSelectors> =
    Lazy::new(|| ListingSelectors::new(".listing .article-box", ".article-title", Some(".article-lead")));

#[derive(Debug, Clone, Copy, Default)]
pub struct FarmerPl;

impl Fetcher for FarmerPl {
    fn name(&self) -> &'static str {
        "farmer.pl"
    }

    fn page_url(&self) -> &str {
        PAGE_URL
    }

    fn extract(&self, html: &str) -> Result<Vec<ArticleRecord>, Box<dyn Error>> {
        extract_listing(html, &RULES, &BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html><body>
          <div class="listing">
            <div class="article-box">
              <a class="article-title" href="/agrobiznes/ceny-zboz,123.html">
                Ceny zbóż na początku tygodnia
              </a>
              <div class="article-lead">Pszenica tanieje, kukurydza stabilna.</div>
            </div>
            <div class="article-box">
              <a class="article-title" href="/technika/ciagniki,456.html">Nowe ciągniki</a>
            </div>
            <div class="article-box"><span>reklama</span></div>
          </div>
          <div class="article-box">
            <a class="article-title" href="/outside">Outside listing</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_listing_cards() {
        let records = FarmerPl.extract(FIXTURE).unwrap();
        assert_eq!(
            records,
            vec![
                ArticleRecord::new(
                    "Ceny zbóż na początku tygodnia",
                    "Pszenica tanieje, kukurydza stabilna.",
                    "https://www.farmer.pl/agrobiznes/ceny-zboz,123.html",
                ),
                ArticleRecord::new("Nowe ciągniki", "", "https://www.farmer.pl/technika/ciagniki,456.html"),
            ]
        );
    }

    #[test]
    fn test_no_listing_is_empty() {
        assert!(FarmerPl.extract("<html><body></body></html>").unwrap().is_empty());
    }
}
