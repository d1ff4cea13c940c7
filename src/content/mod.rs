//! Article and landing-page generation.
//!
//! Each generator first asks the configured provider and falls back to a
//! deterministic template when there is no provider, the call fails, or the
//! output is unusable. Both generators always return a document.
//!
//! # Submodules
//!
//! - [`prompts`]: prompt text sent to the provider
//! - [`extract`]: pulls an HTML document out of free-form output
//! - [`templates`]: the fallback documents

pub mod extract;
pub mod prompts;
pub mod templates;

use crate::api::{ApiError, AskAsync, Provider, RetryAsk};
use crate::fallback::attempt;
use crate::models::ContentRequest;
use crate::utils::truncate_for_log;
use chrono::Local;
use tracing::{debug, info, instrument};

/// Produces content documents from a [`ContentRequest`].
#[derive(Debug)]
pub struct ContentGenerator {
    backend: Option<RetryAsk<Provider>>,
}

impl ContentGenerator {
    /// `None` forces the template path for every request.
    pub fn new(backend: Option<RetryAsk<Provider>>) -> Self {
        match &backend {
            Some(b) => info!(provider = %b.inner().name(), "Content provider configured"),
            None => info!("No content provider configured; templates will be used"),
        }
        Self { backend }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let backend = self.backend.as_ref().ok_or(ApiError::MissingCredential)?;
        let text = backend.ask(prompt).await?;
        debug!(preview = %truncate_for_log(&text, 300), "Provider output");
        Ok(text)
    }

    /// Markdown article with front matter.
    ///
    /// Provider output is used verbatim unless it is empty or whitespace only.
    #[instrument(level = "info", skip_all, fields(keyword = %req.keyword))]
    pub async fn generate_article(&self, req: &ContentRequest) -> String {
        let prompt = prompts::article(req);
        let md = attempt(
            "article",
            self.complete(&prompt),
            |text: &String| text.trim().is_empty(),
            || templates::article(req, Local::now().date_naive()),
        )
        .await;
        info!(bytes = md.len(), "Article ready");
        md
    }

    /// Standalone HTML landing page.
    ///
    /// Provider output is accepted only if an HTML document can be extracted
    /// from it.
    #[instrument(level = "info", skip_all, fields(keyword = %req.keyword))]
    pub async fn generate_landing_page(&self, req: &ContentRequest) -> String {
        let prompt = prompts::landing_page(req);
        let remote = async {
            let text = self.complete(&prompt).await?;
            Ok::<_, ApiError>(extract::html_document(&text).unwrap_or_default())
        };
        let html = attempt(
            "landing page",
            remote,
            String::is_empty,
            || templates::landing_page(req, Local::now().date_naive()),
        )
        .await;
        info!(bytes = html.len(), "Landing page ready");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ProviderConfig, ProviderName};
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ContentRequest {
        ContentRequest {
            keyword: "gardening".into(),
            related_keywords: vec!["gardening trends".into(), "best gardening".into()],
            include_article: true,
            include_landing_page: true,
        }
    }

    fn generator_for(uri: &str) -> ContentGenerator {
        let config = ProviderConfig {
            name: ProviderName::Groq,
            api_key: "k".into(),
            model: "m".into(),
            endpoint: Url::parse(&format!("{uri}/chat")).unwrap(),
        };
        let provider = Provider::from_config(config, Duration::from_secs(5)).unwrap();
        ContentGenerator::new(Some(RetryAsk::new(provider, 0, Duration::from_millis(1))))
    }

    async fn respond_with(server: &MockServer, status: u16, content: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": content } }]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_article_without_provider_uses_template() {
        let generator = ContentGenerator::new(None);
        let md = generator.generate_article(&request()).await;
        assert!(md.starts_with("---\n"));
        assert!(md[4..].contains("\n---\n"));
        assert!(md.contains("# The Ultimate Guide to Gardening"));
    }

    #[tokio::test]
    async fn test_landing_without_provider_uses_template() {
        let generator = ContentGenerator::new(None);
        let html = generator.generate_landing_page(&request()).await;
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Gardening</h1>"));
    }

    #[tokio::test]
    async fn test_article_uses_provider_output_verbatim() {
        let server = MockServer::start().await;
        respond_with(&server, 200, "# Provider article\n\nBody").await;

        let md = generator_for(&server.uri()).generate_article(&request()).await;
        assert_eq!(md, "# Provider article\n\nBody");
    }

    #[tokio::test]
    async fn test_article_falls_back_on_empty_output() {
        let server = MockServer::start().await;
        respond_with(&server, 200, "").await;

        let md = generator_for(&server.uri()).generate_article(&request()).await;
        assert!(md.starts_with("---\n"));
    }

    #[tokio::test]
    async fn test_article_falls_back_on_whitespace_output() {
        let server = MockServer::start().await;
        respond_with(&server, 200, "  \n\t\n").await;

        let md = generator_for(&server.uri()).generate_article(&request()).await;
        assert!(md.starts_with("---\n"));
        assert!(md.contains("# The Ultimate Guide to Gardening"));
    }

    #[tokio::test]
    async fn test_article_falls_back_on_status_error() {
        let server = MockServer::start().await;
        respond_with(&server, 503, "ignored").await;

        let md = generator_for(&server.uri()).generate_article(&request()).await;
        assert!(md.contains("## Getting Started"));
    }

    #[tokio::test]
    async fn test_landing_extracts_fenced_html() {
        let server = MockServer::start().await;
        let page = "<!DOCTYPE html>\n<html><body>generated</body></html>";
        respond_with(&server, 200, &format!("Sure!\n```html\n{page}\n```")).await;

        let html = generator_for(&server.uri())
            .generate_landing_page(&request())
            .await;
        assert_eq!(html, page);
    }

    #[tokio::test]
    async fn test_landing_falls_back_on_prose() {
        let server = MockServer::start().await;
        respond_with(&server, 200, "I cannot produce HTML today.").await;

        let html = generator_for(&server.uri())
            .generate_landing_page(&request())
            .await;
        assert!(html.contains("<section class=\"hero\">"));
    }
}
