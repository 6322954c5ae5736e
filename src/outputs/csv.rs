//! CSV digest for attachment mode.
//!
//! The header row is always `title,lead,link`, even when there are no records,
//! so the attachment stays a valid table.

use crate::models::TranslatedArticleRecord;
use chrono::NaiveDateTime;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

pub const HEADER: [&str; 3] = ["title", "lead", "link"];

/// `translated_news_<YYYY-MM-DD_HH-MM>.csv` for the given local time.
pub fn attachment_filename(at: &NaiveDateTime) -> String {
    format!("translated_news_{}.csv", at.format("%Y-%m-%d_%H-%M"))
}

/// Write `records` as UTF-8 CSV to `path`, replacing any existing file.
#[instrument(level = "info", skip(records), fields(path = %path.display(), count = records.len()))]
pub fn write_records(path: &Path, records: &[TranslatedArticleRecord]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([&record.title, &record.lead, &record.link])?;
    }
    writer.flush()?;
    info!("Wrote CSV digest");
    Ok(())
}
