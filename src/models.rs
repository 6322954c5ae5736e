//! Data models for scraped and translated news teasers.
//!
//! - [`ArticleRecord`]: a teaser as it appears on a source listing page
//! - [`TranslatedArticleRecord`]: the same teaser after translation
//! - [`Translation`]: the outcome of translating a single piece of text

use serde::{Deserialize, Serialize};

/// A news teaser scraped from a listing page.
///
/// Records are created by a fetcher and never mutated afterwards. Two records
/// are the same record when all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Headline text, whitespace-normalized.
    pub title: String,
    /// Teaser paragraph; empty when the site shows none.
    pub lead: String,
    /// Absolute URL of the full article.
    pub link: String,
}

impl ArticleRecord {
    pub fn new(title: impl Into<String>, lead: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lead: lead.into(),
            link: link.into(),
        }
    }
}

/// A teaser whose title and lead went through the translator.
///
/// Field order matches the CSV header (`title,lead,link`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedArticleRecord {
    pub title: String,
    pub lead: String,
    /// Copied unchanged from the source [`ArticleRecord`].
    pub link: String,
}

/// Result of translating one string.
///
/// A failed translation is not an error for the pipeline: the original text
/// is kept and the cause travels along so callers can tell degraded output
/// from a clean translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// The model's reply, trimmed. Empty input yields `Translated("")`.
    Translated(String),
    /// The model could not be reached or answered unusably.
    Fallback { original: String, cause: String },
}

impl Translation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Translation::Fallback { .. })
    }

    /// Text to publish: the translation, or the original on fallback.
    pub fn into_text(self) -> String {
        match self {
            Translation::Translated(text) => text,
            Translation::Fallback { original, .. } => original,
        }
    }
}
