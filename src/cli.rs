//! Command-line interface definitions for Awful Trends.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Provider credentials and model overrides are read from the environment
//! through `env` attributes; everything else comes from flags.

use crate::api::Credentials;
use clap::Parser;

/// Command-line arguments for the Awful Trends application.
///
/// # Examples
///
/// ```sh
/// # Article, landing page and raw data for one keyword
/// awful_trends --keyword "artificial intelligence"
///
/// # Ten related keywords, landing page only
/// awful_trends -k "web development" -c 10 --no-article
///
/// # With Groq credentials
/// GROQ_API_KEY=... awful_trends -k marketing -o ./site/content
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keyword to look up
    #[arg(short, long)]
    pub keyword: String,

    /// Number of related keywords fed into the generated content
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    pub count: u16,

    /// Skip article generation
    #[arg(long)]
    pub no_article: bool,

    /// Skip landing page generation
    #[arg(long)]
    pub no_landing_page: bool,

    /// Output directory for generated files
    #[arg(short, long, default_value = "./generated-content")]
    pub output_dir: String,

    /// Timeout applied to every remote call, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries for a failed provider call before falling back to templates
    #[arg(long, default_value_t = 2)]
    pub llm_retries: usize,

    /// API key for Groq (preferred provider)
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Model used with Groq
    #[arg(long, env = "GROQ_MODEL")]
    pub groq_model: Option<String>,

    /// API key for OpenRouter (used when no Groq key is set)
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    pub openrouter_api_key: Option<String>,

    /// Model used with OpenRouter
    #[arg(long, env = "OPENROUTER_MODEL")]
    pub openrouter_model: Option<String>,
}

impl Cli {
    /// Credentials as collected from flags and environment.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            groq_api_key: self.groq_api_key.clone(),
            groq_model: self.groq_model.clone(),
            openrouter_api_key: self.openrouter_api_key.clone(),
            openrouter_model: self.openrouter_model.clone(),
        }
    }
}
