//! # Awful Trends
//!
//! Fetches keyword trend signals from the public trends service and turns
//! them into a markdown article and an HTML landing page, using an
//! OpenAI-compatible LLM when one is configured and deterministic templates
//! otherwise.
//!
//! ## Usage
//!
//! ```sh
//! awful_trends --keyword "artificial intelligence" -c 8 -o ./generated-content
//! ```
//!
//! ## Architecture
//!
//! 1. **Trends**: related/rising queries and interest over time, with
//!    synthetic substitutes for anything the service does not deliver
//! 2. **Generation**: prompt the provider (Groq, else OpenRouter), fall back
//!    to templates on any failure
//! 3. **Output**: `<slug>-article.md`, `<slug>-landing.html`, `<slug>-trends.json`

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod content;
mod fallback;
mod models;
mod outputs;
mod pipeline;
mod trends;
mod utils;

use api::{Provider, ProviderConfig, RetryAsk};
use cli::Cli;
use content::ContentGenerator;
use outputs::DirSink;
use pipeline::{Pipeline, RunOptions};
use trends::{TrendFetcher, TrendsConfig};
use utils::ensure_writable_dir;

#[tokio::main]
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
    info!("awful_trends starting up");

    let args = Cli::parse();
    debug!(keyword = %args.keyword, count = args.count, output_dir = %args.output_dir, "Parsed CLI arguments");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let timeout = Duration::from_secs(args.timeout_secs);

    let backend = match ProviderConfig::select(&args.credentials()) {
        Some(config) => {
            info!(provider = %config.name, model = %config.model, "Selected LLM provider");
            let provider = Provider::from_config(config, timeout)?;
            Some(RetryAsk::new(provider, args.llm_retries, Duration::from_secs(1)))
        }
        None => {
            info!("Set GROQ_API_KEY or OPENROUTER_API_KEY to enable LLM generation");
            None
        }
    };

    let pipeline = Pipeline::new(
        TrendFetcher::new(TrendsConfig::with_timeout(timeout))?,
        ContentGenerator::new(backend),
        DirSink::new(&args.output_dir),
    );

    let opts = RunOptions {
        include_article: !args.no_article,
        include_landing_page: !args.no_landing_page,
        limit: usize::from(args.count),
    };

    if let Err(e) = pipeline.run(&args.keyword, opts).await {
        error!(keyword = %args.keyword, error = %e, "Run failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
