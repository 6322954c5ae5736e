//! Command-line interface definitions.
//!
//! Every option can also come from an environment variable, so a scheduled
//! run needs nothing but the environment.

use crate::mail::DeliveryMode;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for agri_news_digest.
///
/// # Examples
///
/// ```sh
/// # Inline HTML digest, everything from the environment
/// OPENAI_API_KEY=... EMAIL_USER=... EMAIL_PASS=... EMAIL_TO=... agri_news_digest
///
/// # CSV attachment written to ./out
/// agri_news_digest --delivery attachment --output-dir ./out
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// How the digest is delivered
    #[arg(short, long, env = "DELIVERY_MODE", value_enum, default_value_t = DeliveryMode::Inline)]
    pub delivery: DeliveryMode,

    /// Directory for the CSV file in attachment mode
    #[arg(short, long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "AGRI_NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra attempts per translation request after the first one fails
    #[arg(long, env = "TRANSLATE_RETRIES", default_value_t = 0)]
    pub translate_retries: usize,

    /// API key for the chat completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Sender address, also the SMTP login
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    /// SMTP password
    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// Recipient address
    #[arg(long, env = "EMAIL_TO")]
    pub email_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["agri_news_digest"]).unwrap();
        assert_eq!(cli.translate_retries, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_attachment_mode() {
        let cli = Cli::parse_from([
            "agri_news_digest",
            "--delivery",
            "attachment",
            "-o",
            "/tmp/digest",
            "--email-to",
            "editor@example.com",
        ]);

        assert_eq!(cli.delivery, DeliveryMode::Attachment);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/digest"));
        assert_eq!(cli.email_to.as_deref(), Some("editor@example.com"));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let res = Cli::try_parse_from(["agri_news_digest", "--delivery", "fax"]);
        assert!(res.is_err());
    }
}
