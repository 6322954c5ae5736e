//! Page retrieval for the listing scrapers.
//!
//! [`PageLoader`] is the seam between the scrapers and the network: the
//! pipeline uses [`HttpPageLoader`], tests hand in fixture HTML.

use crate::config::HttpSettings;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Fetch the body of a page as text.
pub trait PageLoader {
    async fn load(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// [`PageLoader`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpPageLoader {
    client: reqwest::Client,
}

impl HttpPageLoader {
    pub fn new(settings: &HttpSettings) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }
}

/// Build the `reqwest` client shared by page loading and translation.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, Box<dyn Error>> {
    let mut builder = reqwest::Client::builder().user_agent(settings.user_agent.clone());
    if let Some(secs) = settings.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

impl PageLoader for HttpPageLoader {
    #[instrument(level = "info", skip(self))]
    async fn load(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            // The error page is still parsed; it just yields no teasers.
            warn!(%status, "Listing page returned non-success status");
        }
        let body = response.text().await?;
        debug!(
            %status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
