//! Digest delivery by email.
//!
//! Two interchangeable modes, picked at runtime with [`DeliveryMode`]:
//!
//! - **Inline**: the HTML digest is the message body (with a plain-text
//!   alternative for clients that refuse HTML)
//! - **Attachment**: the digest is written to a timestamped CSV file, read
//!   back and attached to a short plain-text message
//!
//! Either way exactly one message goes to one recipient. The [`Mailer`] trait
//! is the transport seam; [`SmtpMailer`] talks to a relay over implicit TLS.

use crate::config::MailSettings;
use crate::models::TranslatedArticleRecord;
use crate::outputs::{csv, html};
use crate::utils::ensure_writable_dir;
use chrono::Local;
use clap::ValueEnum;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, instrument};

const HTML_FALLBACK_TEXT: &str = "This message is formatted as HTML. Please enable HTML display to read it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryMode {
    /// HTML digest as the message body
    Inline,
    /// CSV digest as a file attachment
    Attachment,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Inline => f.write_str("inline"),
            DeliveryMode::Attachment => f.write_str("attachment"),
        }
    }
}

/// Sends a fully built message.
pub trait Mailer {
    async fn send(&self, message: Message) -> Result<(), Box<dyn Error>>;
}

/// [`Mailer`] that authenticates to an SMTP relay over implicit TLS.
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings, user: Option<String>, pass: Option<String>) -> Self {
        let credentials = match (user, pass) {
            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
            _ => None,
        };
        Self {
            host: settings.smtp_host.clone(),
            port: settings.smtp_port,
            credentials,
        }
    }
}

impl Mailer for SmtpMailer {
    #[instrument(level = "info", skip_all, fields(host = %self.host, port = self.port))]
    async fn send(&self, message: Message) -> Result<(), Box<dyn Error>> {
        let credentials = self
            .credentials
            .clone()
            .ok_or("EMAIL_USER and EMAIL_PASS must both be set")?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(credentials)
            .build();
        transport.send(message).await?;
        Ok(())
    }
}

/// What a successful delivery sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub mode: DeliveryMode,
    pub recipient: String,
    /// The CSV file on disk, attachment mode only.
    pub attachment: Option<PathBuf>,
}

/// Formats the digest for the selected mode and hands it to a [`Mailer`].
#[derive(Debug)]
pub struct Delivery<M> {
    mailer: M,
    mode: DeliveryMode,
    from: Option<String>,
    to: Option<String>,
    output_dir: PathBuf,
    settings: MailSettings,
}

impl<M: Mailer> Delivery<M> {
    pub fn new(
        mailer: M,
        mode: DeliveryMode,
        from: Option<String>,
        to: Option<String>,
        output_dir: PathBuf,
        settings: MailSettings,
    ) -> Self {
        Self {
            mailer,
            mode,
            from,
            to,
            output_dir,
            settings,
        }
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    #[cfg(test)]
    pub(crate) fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Build and send the single digest message.
    #[instrument(level = "info", skip_all, fields(mode = %self.mode, count = records.len()))]
    pub async fn deliver(&self, records: &[TranslatedArticleRecord]) -> Result<DeliveryReceipt, Box<dyn Error>> {
        let from: Mailbox = self.from.as_deref().ok_or("EMAIL_USER is not set")?.parse()?;
        let to: Mailbox = self.to.as_deref().ok_or("EMAIL_TO is not set")?.parse()?;
        let recipient = to.email.to_string();

        let (message, attachment) = match self.mode {
            DeliveryMode::Inline => (build_inline_message(from, to, records, &self.settings)?, None),
            DeliveryMode::Attachment => {
                let filename = csv::attachment_filename(&Local::now().naive_local());
                ensure_writable_dir(&self.output_dir).await?;
                let path = self.output_dir.join(&filename);
                csv::write_records(&path, records)?;
                let bytes = tokio::fs::read(&path).await?;
                let message = build_attachment_message(from, to, &filename, bytes, &self.settings)?;
                (message, Some(path))
            }
        };

        self.mailer.send(message).await?;
        info!(%recipient, "Digest sent");
        Ok(DeliveryReceipt {
            mode: self.mode,
            recipient,
            attachment,
        })
    }
}

/// HTML digest body with a plain-text alternative.
pub fn build_inline_message(
    from: Mailbox,
    to: Mailbox,
    records: &[TranslatedArticleRecord],
    settings: &MailSettings,
) -> Result<Message, Box<dyn Error>> {
    let body = html::render_digest(records, settings);
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(settings.subject.clone())
        .multipart(MultiPart::alternative_plain_html(HTML_FALLBACK_TEXT.to_string(), body))?;
    Ok(message)
}

/// Short text body naming the file, with the CSV bytes attached under `filename`.
pub fn build_attachment_message(
    from: Mailbox,
    to: Mailbox,
    filename: &str,
    csv_bytes: Vec<u8>,
    settings: &MailSettings,
) -> Result<Message, Box<dyn Error>> {
    let attachment = Attachment::new(filename.to_string())
        .body(csv_bytes, ContentType::parse("application/octet-stream")?);
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(settings.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(format!(
                    "The translated news digest is attached: {filename}"
                )))
                .singlepart(attachment),
        )?;
    Ok(message)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Keeps every message instead of sending it.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingMailer {
        pub sent: RefCell<Vec<Message>>,
        pub fail: bool,
    }

    impl Mailer for RecordingMailer {
        async fn send(&self, message: Message) -> Result<(), Box<dyn Error>> {
            if self.fail {
                return Err("535 authentication failed".into());
            }
            self.sent.borrow_mut().push(message);
            Ok(())
        }
    }

    fn records() -> Vec<TranslatedArticleRecord> {
        vec![TranslatedArticleRecord {
            title: "Búzaárak, emelkedés".into(),
            lead: "A \"Matif\" jegyzései".into(),
            link: "https://www.agrarheute.com/markt".into(),
        }]
    }

    fn delivery(mode: DeliveryMode, dir: PathBuf, mailer: RecordingMailer) -> Delivery<RecordingMailer> {
        Delivery::new(
            mailer,
            mode,
            Some("digest@example.com".into()),
            Some("editor@example.com".into()),
            dir,
            MailSettings::default(),
        )
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[tokio::test]
    async fn test_inline_mode_sends_html_body() {
        let tmp = tempfile::tempdir().unwrap();
        let d = delivery(DeliveryMode::Inline, tmp.path().to_path_buf(), RecordingMailer::default());

        let receipt = d.deliver(&records()).await.unwrap();

        assert_eq!(receipt.recipient, "editor@example.com");
        assert!(receipt.attachment.is_none());
        let sent = d.mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        let raw = formatted(&sent[0]);
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert_eq!(sent[0].envelope().to().len(), 1);
    }

    #[tokio::test]
    async fn test_attachment_mode_with_no_records_still_sends_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let d = delivery(DeliveryMode::Attachment, out.clone(), RecordingMailer::default());

        let receipt = d.deliver(&[]).await.unwrap();

        let path = receipt.attachment.expect("attachment path");
        assert!(path.starts_with(&out));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("translated_news_") && name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "title,lead,link\n");

        let sent = d.mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        let raw = formatted(&sent[0]);
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("attachment"));
        assert!(raw.contains(&name));
    }

    #[tokio::test]
    async fn test_missing_recipient_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let d = Delivery::new(
            RecordingMailer::default(),
            DeliveryMode::Inline,
            Some("digest@example.com".into()),
            None,
            tmp.path().to_path_buf(),
            MailSettings::default(),
        );
        let err = d.deliver(&records()).await.unwrap_err();
        assert!(err.to_string().contains("EMAIL_TO"));
        assert!(d.mailer.sent.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let d = delivery(DeliveryMode::Inline, tmp.path().to_path_buf(), mailer);
        assert!(d.deliver(&records()).await.is_err());
    }

    #[tokio::test]
    async fn test_smtp_mailer_requires_credentials() {
        let mailer = SmtpMailer::new(&MailSettings::default(), Some("digest@example.com".into()), None);
        let message = build_inline_message(
            "digest@example.com".parse().unwrap(),
            "editor@example.com".parse().unwrap(),
            &records(),
            &MailSettings::default(),
        )
        .unwrap();
        let err = mailer.send(message).await.unwrap_err();
        assert!(err.to_string().contains("EMAIL_PASS"));
    }
}
