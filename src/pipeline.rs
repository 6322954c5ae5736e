//! The fetch → translate → deliver run.
//!
//! Steps run strictly one after another. A failing source aborts the run;
//! failed translations degrade to the original text; a failed delivery is
//! logged and recorded in the [`RunReport`].

use crate::loader::PageLoader;
use crate::mail::{Delivery, DeliveryReceipt, Mailer};
use crate::models::{ArticleRecord, TranslatedArticleRecord};
use crate::scrapers::{self, Fetcher};
use crate::translate::{AskAsync, Translator};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::cell::Cell;
use std::error::Error;
use tracing::{error, info, instrument};

/// Outcome of one run.
#[derive(Debug)]
pub struct RunReport {
    pub fetched: usize,
    pub translated: usize,
    /// Number of title/lead fields that kept their original text.
    pub fallbacks: usize,
    /// `None` when delivery failed.
    pub delivery: Option<DeliveryReceipt>,
}

/// Translate title and lead of every record, preserving order and links.
///
/// Returns the translated records and the number of fields that fell back.
pub async fn translate_all<A: AskAsync>(
    records: &[ArticleRecord],
    translator: &Translator<A>,
) -> (Vec<TranslatedArticleRecord>, usize) {
    let total = records.len();
    let fallbacks = Cell::new(0usize);

    let translated: Vec<TranslatedArticleRecord> = stream::iter(records.iter().enumerate())
        .then(|(i, record)| {
            let fallbacks = &fallbacks;
            async move {
                info!(
                    index = i + 1,
                    total,
                    title = %truncate_for_log(&record.title, 80),
                    "Translating"
                );
                let title = translator.translate(&record.title).await;
                let lead = translator.translate(&record.lead).await;
                let failed = usize::from(title.is_fallback()) + usize::from(lead.is_fallback());
                fallbacks.set(fallbacks.get() + failed);

                TranslatedArticleRecord {
                    title: title.into_text(),
                    lead: lead.into_text(),
                    link: record.link.clone(),
                }
            }
        })
        .collect()
        .await;

    (translated, fallbacks.get())
}

/// Run the whole pipeline once.
#[instrument(level = "info", skip_all, fields(sources = fetchers.len(), mode = %delivery.mode()))]
pub async fn run<L, A, M>(
    fetchers: &[Box<dyn Fetcher>],
    loader: &L,
    translator: &Translator<A>,
    delivery: &Delivery<M>,
) -> Result<RunReport, Box<dyn Error>>
where
    L: PageLoader,
    A: AskAsync,
    M: Mailer,
{
    let records = scrapers::fetch_all(fetchers, loader).await?;
    let fetched = records.len();

    let (translated, fallbacks) = translate_all(&records, translator).await;
    if fallbacks > 0 {
        info!(fallbacks, "Some fields were left untranslated");
    }

    let delivery = match delivery.deliver(&translated).await {
        Ok(receipt) => Some(receipt),
        Err(e) => {
            error!(error = %e, "Delivery failed; continuing");
            None
        }
    };

    info!(count = translated.len(), delivered = delivery.is_some(), "News translated");
    Ok(RunReport {
        fetched,
        translated: translated.len(),
        fallbacks,
        delivery,
    })
}
