//! Run settings loaded from an optional YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behaviour: `gpt-4` at temperature 0.5 translating into Hungarian,
//! mailed through `smtp.gmail.com:465`.
//!
//! ```yaml
//! translator:
//!   model: gpt-4o-mini
//!   target_language: German
//! mail:
//!   subject: Agrarnachrichten
//! ```

use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub translator: TranslatorSettings,
    pub mail: MailSettings,
    pub http: HttpSettings,
}

/// Parameters of the chat completions request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    /// Base URL of an OpenAI-compatible API, without the trailing path.
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub target_language: String,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.5,
            target_language: "Hungarian".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    /// `<h2>` shown at the top of the inline digest.
    pub heading: String,
    /// Anchor text of each "read the original" link.
    pub link_label: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            subject: "📰 Translated agricultural news".to_string(),
            heading: "📰 Translated agricultural news".to_string(),
            link_label: "🔗 Read the original article".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub user_agent: String,
    /// Per-request timeout in seconds; unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let yaml = tokio::fs::read_to_string(path).await?;
        let settings = Self::from_yaml(&yaml)?;
        info!(model = %settings.translator.model, language = %settings.translator.target_language, "Loaded settings");
        Ok(settings)
    }
}
