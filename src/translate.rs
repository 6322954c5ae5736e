//! Translation through an OpenAI-compatible chat completions API.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait, send text to a model and get a reply
//! - [`ChatCompletions`]: HTTP backend speaking the chat completions protocol
//! - [`RetryAsk`]: decorator adding exponential backoff to any [`AskAsync`]
//! - [`Translator`]: turns backend results into a [`Translation`], never an error
//!
//! # Retry Strategy
//!
//! Retries are off by default. When enabled, the delay doubles from the base
//! delay, is capped at 30 seconds, and gets 0-250ms of random jitter.

use crate::config::TranslatorSettings;
use crate::models::Translation;
use crate::utils::truncate_for_log;
use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Trait for async LLM interaction.
///
/// This abstraction allows different backends or decorators (like retry logic).
pub trait AskAsync {
    /// Send text to the model and receive its reply.
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    inner: T,
    /// Attempts after the first one; 0 disables retrying.
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(31) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync,
{
    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                                error = %e,
                                "ask() exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat completions backend instructed to translate into one language.
pub struct ChatCompletions {
    client: reqwest::Client,
    api_key: Option<String>,
    settings: TranslatorSettings,
}

impl fmt::Debug for ChatCompletions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletions")
            .field("api_base", &self.settings.api_base)
            .field("model", &self.settings.model)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl ChatCompletions {
    pub fn new(client: reqwest::Client, api_key: Option<String>, settings: TranslatorSettings) -> Self {
        Self {
            client,
            api_key,
            settings,
        }
    }

    fn system_prompt(&self) -> String {
        format!("You are a professional {} translator.", self.settings.target_language)
    }

    fn user_prompt(&self, text: &str) -> String {
        format!("Translate into {}:\n\n{}", self.settings.target_language, text)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.api_base.trim_end_matches('/'))
    }
}

impl AskAsync for ChatCompletions {
    #[instrument(level = "debug", skip_all, fields(model = %self.settings.model))]
    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let api_key = self.api_key.as_deref().ok_or("OPENAI_API_KEY is not set")?;

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: self.user_prompt(text),
                },
            ],
            temperature: self.settings.temperature,
        };

        let t0 = Instant::now();
        let response: ChatResponse = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "Chat completion received");

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "chat completion returned no choices".into())
    }
}

/// Translates text with graceful degradation.
#[derive(Debug)]
pub struct Translator<A> {
    backend: A,
}

impl<A: AskAsync> Translator<A> {
    pub fn new(backend: A) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &A {
        &self.backend
    }

    /// Translate `text`.
    ///
    /// Empty input returns `Translated("")` without calling the backend. Any
    /// backend failure is logged and turned into [`Translation::Fallback`]
    /// carrying the original text.
    pub async fn translate(&self, text: &str) -> Translation {
        if text.is_empty() {
            return Translation::Translated(String::new());
        }
        match self.backend.ask(text).await {
            Ok(reply) => Translation::Translated(reply.trim().to_string()),
            Err(e) => {
                warn!(
                    error = %e,
                    text = %truncate_for_log(text, 80),
                    "Translation failed; keeping original text"
                );
                Translation::Fallback {
                    original: text.to_string(),
                    cause: e.to_string(),
                }
            }
        }
    }
}
