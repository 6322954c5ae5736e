//! Inline HTML digest.
//!
//! ```text
//! <html><body>
//! <h2>heading</h2>
//! <hr>
//! <p><strong>title</strong></p>
//! <p><em>lead</em></p>          (only when the lead is non-empty)
//! <p><a href='link'>label</a></p>
//! ...
//! </body></html>
//! ```

use crate::config::MailSettings;
use crate::models::TranslatedArticleRecord;
use crate::utils::escape_html;
use itertools::Itertools;

/// Render every record into a single HTML document, in order.
pub fn render_digest(records: &[TranslatedArticleRecord], labels: &MailSettings) -> String {
    let entries = records.iter().map(|r| render_entry(r, &labels.link_label)).join("\n");

    let mut lines = vec![
        "<html><body>".to_string(),
        format!("<h2>{}</h2>", escape_html(&labels.heading)),
    ];
    if !entries.is_empty() {
        lines.push(entries);
    }
    lines.push("</body></html>".to_string());
    lines.join("\n")
}

fn render_entry(record: &TranslatedArticleRecord, link_label: &str) -> String {
    let mut lines = vec![
        "<hr>".to_string(),
        format!("<p><strong>{}</strong></p>", escape_html(&record.title)),
    ];
    if !record.lead.is_empty() {
        lines.push(format!("<p><em>{}</em></p>", escape_html(&record.lead)));
    }
    lines.push(format!(
        "<p><a href='{}'>{}</a></p>",
        escape_html(&record.link),
        escape_html(link_label)
    ));
    lines.join("\n")
}
