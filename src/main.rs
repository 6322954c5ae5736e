//! # agri_news_digest
//!
//! Collects the current teasers from agricultural news sites, translates
//! titles and leads through an OpenAI-compatible chat model, and mails the
//! digest to one recipient.
//!
//! ## Features
//!
//! - Scrapes listing pages of farmer.pl, agrarheute, cenyrolnicze.pl and
//!   wiescirolnicze.pl
//! - Translates every title and lead separately; failed translations keep the
//!   original text
//! - Delivers either an inline HTML mail or a mail with a CSV attachment
//!
//! ## Usage
//!
//! ```sh
//! OPENAI_API_KEY=... EMAIL_USER=... EMAIL_PASS=... EMAIL_TO=... agri_news_digest --delivery attachment
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one GET per source listing page, parsed into records
//! 2. **Translation**: two model calls per record (title, lead), in order
//! 3. **Delivery**: one message over SMTP, HTML body or CSV attachment

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod loader;
mod mail;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod translate;
mod utils;

use cli::Cli;
use config::Settings;
use loader::{build_client, HttpPageLoader};
use mail::{Delivery, SmtpMailer};
use translate::{ChatCompletions, RetryAsk, Translator};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("agri_news_digest starting up");

    let args = Cli::parse();
    debug!(delivery = %args.delivery, output_dir = %args.output_dir.display(), config = ?args.config, "Parsed CLI arguments");

    let settings = match &args.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };

    if args.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every field will keep its original text");
    }

    let loader = HttpPageLoader::new(&settings.http)?;
    let backend = ChatCompletions::new(
        build_client(&settings.http)?,
        args.openai_api_key.clone(),
        settings.translator.clone(),
    );
    let translator = Translator::new(RetryAsk::new(backend, args.translate_retries, Duration::from_secs(1)));
    let mailer = SmtpMailer::new(&settings.mail, args.email_user.clone(), args.email_pass.clone());
    let delivery = Delivery::new(
        mailer,
        args.delivery,
        args.email_user.clone(),
        args.email_to.clone(),
        args.output_dir.clone(),
        settings.mail.clone(),
    );

    let fetchers = scrapers::default_fetchers();
    let report = pipeline::run(&fetchers, &loader, &translator, &delivery).await?;

    if let Some(receipt) = &report.delivery {
        info!(mode = %receipt.mode, recipient = %receipt.recipient, attachment = ?receipt.attachment, "Delivery receipt");
    }

    let elapsed = start_time.elapsed();
    info!(
        fetched = report.fetched,
        translated = report.translated,
        fallbacks = report.fallbacks,
        delivered = report.delivery.is_some(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
