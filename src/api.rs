//! Chat-completion providers with exponential backoff retry logic.
//!
//! # Architecture
//!
//! - [`AskAsync`]: capability trait, `prompt -> text`
//! - [`Groq`] / [`OpenRouter`]: the two OpenAI-compatible backends
//! - [`Provider`]: tagged variant over the two, chosen once at startup from a
//!   [`ProviderConfig`]
//! - [`RetryAsk`]: decorator that adds retry logic to any `AskAsync`
//!
//! # Retry Strategy
//!
//! - Retries only [`ApiError::is_retryable`] failures (transport, 429, 5xx)
//! - Exponential backoff starting at 1 second, capped at 30 seconds
//! - Random jitter (0-250ms) added to each delay

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::utils::truncate_for_log;

pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const GROQ_DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
pub const OPENROUTER_DEFAULT_MODEL: &str = "anthropic/claude-3-sonnet";

const SYSTEM_PROMPT: &str =
    "You are an expert content writer specializing in SEO-optimized articles and landing pages.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4000;

const OPENROUTER_REFERER: &str = "http://localhost";
const OPENROUTER_TITLE: &str = "Awful Trends";

/// Ways a provider call can fail. The content generator treats all of them
/// the same way: fall back to the template.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no provider credential configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed provider response: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its text output.
pub trait AskAsync {
    async fn ask(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Which backend a [`ProviderConfig`] talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderName {
    Groq,
    OpenRouter,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Groq => f.write_str("groq"),
            ProviderName::OpenRouter => f.write_str("openrouter"),
        }
    }
}

/// Credential and model values collected at startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: Option<String>,
}

/// The provider selected for this process.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub name: ProviderName,
    pub api_key: String,
    pub model: String,
    pub endpoint: Url,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ProviderConfig {
    /// Pick a provider: Groq if its key is present, else OpenRouter, else none.
    pub fn select(creds: &Credentials) -> Option<Self> {
        if let Some(key) = non_empty(&creds.groq_api_key) {
            return Some(Self {
                name: ProviderName::Groq,
                api_key: key.to_string(),
                model: non_empty(&creds.groq_model)
                    .unwrap_or(GROQ_DEFAULT_MODEL)
                    .to_string(),
                endpoint: Url::parse(GROQ_ENDPOINT).ok()?,
            });
        }
        if let Some(key) = non_empty(&creds.openrouter_api_key) {
            return Some(Self {
                name: ProviderName::OpenRouter,
                api_key: key.to_string(),
                model: non_empty(&creds.openrouter_model)
                    .unwrap_or(OPENROUTER_DEFAULT_MODEL)
                    .to_string(),
                endpoint: Url::parse(OPENROUTER_ENDPOINT).ok()?,
            });
        }
        None
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Shared HTTPS chat-completion plumbing for both providers.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    config: ProviderConfig,
}

impl ChatClient {
    pub fn new(http: Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    /// POST one system+user exchange and return the first choice's text.
    ///
    /// A response with no choices or no content yields an empty string.
    async fn complete(&self, prompt: &str, extra: HeaderMap) -> Result<String, ApiError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let resp = self
            .http
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .headers(extra)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: truncate_for_log(&text, 300),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

/// Groq's OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct Groq {
    chat: ChatClient,
}

impl AskAsync for Groq {
    async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        self.chat.complete(prompt, HeaderMap::new()).await
    }
}

/// OpenRouter, which also wants attribution headers naming the caller.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    chat: ChatClient,
}

impl AskAsync for OpenRouter {
    async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("http-referer"),
            HeaderValue::from_str(OPENROUTER_REFERER)?,
        );
        headers.insert(
            HeaderName::from_static("x-title"),
            HeaderValue::from_str(OPENROUTER_TITLE)?,
        );
        self.chat.complete(prompt, headers).await
    }
}

/// The backend chosen at startup.
#[derive(Debug, Clone)]
pub enum Provider {
    Groq(Groq),
    OpenRouter(OpenRouter),
}

impl Provider {
    /// Build the variant matching `config.name`.
    pub fn from_config(config: ProviderConfig, timeout: StdDuration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        let name = config.name;
        let chat = ChatClient::new(http, config);
        Ok(match name {
            ProviderName::Groq => Provider::Groq(Groq { chat }),
            ProviderName::OpenRouter => Provider::OpenRouter(OpenRouter { chat }),
        })
    }

    pub fn name(&self) -> ProviderName {
        match self {
            Provider::Groq(_) => ProviderName::Groq,
            Provider::OpenRouter(_) => ProviderName::OpenRouter,
        }
    }
}

impl AskAsync for Provider {
    #[instrument(level = "info", skip_all, fields(provider = %self.name()))]
    async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let t0 = Instant::now();
        let res = match self {
            Provider::Groq(p) => p.ask(prompt).await,
            Provider::OpenRouter(p) => p.ask(prompt).await,
        };
        let dt = t0.elapsed();

        match &res {
            Ok(text) => info!(elapsed_ms = dt.as_millis() as u64, chars = text.len(), "Provider call succeeded"),
            Err(e) => warn!(elapsed_ms = dt.as_millis() as u64, error = %e, "Provider call failed"),
        }
        res
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`AskAsync`] implementation.
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryAsk<T> {
    /// The underlying LLM client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
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

    pub fn inner(&self) -> &T {
        &self.inner
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
    #[instrument(level = "info", skip_all)]
    async fn ask(&self, prompt: &str) -> Result<String, ApiError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(prompt).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries || !e.is_retryable() {
                        error!(
                            attempt,
                            max = self.max_retries,
                            retryable = e.is_retryable(),
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "ask() giving up"
                        );
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1).min(16));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
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
