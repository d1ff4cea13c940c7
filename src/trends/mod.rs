//! Keyword trend acquisition with synthetic fallback.
//!
//! [`TrendFetcher::fetch`] makes two independent calls to the public trends
//! service:
//!
//! 1. **Ranked queries** (`widgetdata/relatedsearches`): top and rising
//!    queries associated with the keyword over the last seven days
//! 2. **Interest over time** (`widgetdata/multiline`): hourly interest for the
//!    same window
//!
//! Either call may fail (transport error, non-success status, unframed body,
//! bad JSON) or come back empty. Each failure is absorbed and replaced by the
//! matching generator in [`synthetic`], so `fetch` always returns a snapshot
//! with non-empty query lists.

pub mod parse;
pub mod synthetic;

use crate::fallback::{attempt, settle};
use crate::models::{InterestPoint, TrendSnapshot};
use chrono::{Datelike, Local, SecondsFormat, Utc};
use parse::RankedQueries;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://trends.google.com/";
/// Access token expected by the widget endpoints. May need refreshing if the
/// service rotates it.
pub const DEFAULT_TOKEN: &str = "APP6_UEAAAAAZqOa";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const RELATED_PATH: &str = "trends/api/widgetdata/relatedsearches";
const MULTILINE_PATH: &str = "trends/api/widgetdata/multiline";
const TIME_WINDOW: &str = "now 7-d";

/// Ways a single trends call can fail.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("trends service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("response is not framed JSON")]
    Unframed,

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Where and how to reach the trends service.
#[derive(Debug, Clone)]
pub struct TrendsConfig {
    pub base_url: Url,
    pub token: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl TrendsConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default trends URL"),
            token: DEFAULT_TOKEN.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the trends service.
#[derive(Debug, Clone)]
pub struct TrendFetcher {
    client: Client,
    config: TrendsConfig,
}

impl TrendFetcher {
    /// Build a fetcher.
    ///
    /// # Errors
    ///
    /// Fails only if the HTTP client cannot be constructed (TLS backend).
    pub fn new(config: TrendsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Look up `keyword`, substituting synthetic data wherever the service
    /// does not deliver.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, keyword: &str) -> TrendSnapshot {
        let t0 = Instant::now();
        let year = Local::now().year();

        let ranked = attempt(
            "ranked queries",
            self.fetch_ranked_queries(keyword),
            RankedQueries::is_empty,
            || RankedQueries {
                related: synthetic::related_queries(keyword, year),
                rising: synthetic::rising_queries(keyword),
            },
        )
        .await;

        let related = settle(
            "related queries",
            Ok::<_, FetchError>(ranked.related),
            Vec::is_empty,
            || synthetic::related_queries(keyword, year),
        );
        let rising = settle(
            "rising queries",
            Ok::<_, FetchError>(ranked.rising),
            Vec::is_empty,
            || synthetic::rising_queries(keyword),
        );

        let interest = attempt(
            "interest over time",
            self.fetch_interest_over_time(keyword),
            Vec::is_empty,
            || synthetic::interest_series(Local::now().date_naive(), &mut rand::rng()),
        )
        .await;

        info!(
            related = related.len(),
            rising = rising.len(),
            interest_points = interest.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Trend snapshot ready"
        );

        TrendSnapshot::new(
            keyword,
            related,
            rising,
            interest,
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    }

    async fn fetch_ranked_queries(&self, keyword: &str) -> Result<RankedQueries, FetchError> {
        let body = self.get_framed(RELATED_PATH, &related_request(keyword)).await?;
        let queries = parse::ranked_queries(&body)?;
        debug!(
            related = queries.related.len(),
            rising = queries.rising.len(),
            "Parsed ranked queries"
        );
        Ok(queries)
    }

    async fn fetch_interest_over_time(&self, keyword: &str) -> Result<Vec<InterestPoint>, FetchError> {
        let body = self
            .get_framed(MULTILINE_PATH, &multiline_request(keyword))
            .await?;
        parse::interest_over_time(&body)
    }

    /// GET a widget endpoint and return the raw body.
    ///
    /// The `req` filter is serialized and percent-encoded into the query
    /// string.
    async fn get_framed(&self, path: &str, req: &Value) -> Result<String, FetchError> {
        let endpoint = self.config.base_url.join(path)?;
        let url = format!(
            "{endpoint}?hl=en-US&tz=-420&req={}&token={}",
            urlencoding::encode(&req.to_string()),
            urlencoding::encode(&self.config.token),
        );
        debug!(%endpoint, "Requesting trends widget");

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text().await?)
    }
}

fn keyword_restriction(keyword: &str) -> Value {
    json!({ "keyword": [{ "type": "BROAD", "value": keyword }] })
}

fn request_options() -> Value {
    json!({ "property": "", "backend": "IZG", "category": 0 })
}

fn related_request(keyword: &str) -> Value {
    json!({
        "restriction": {
            "geo": {},
            "time": TIME_WINDOW,
            "originalTimeRangeForExploreUrl": TIME_WINDOW,
            "complexKeywordsRestriction": keyword_restriction(keyword),
        },
        "keywordType": "QUERY",
        "metric": ["TOP", "RISING"],
        "trendinessSettings": { "compareTime": "2021-01-01 2022-01-01" },
        "requestOptions": request_options(),
        "language": "en",
    })
}

fn multiline_request(keyword: &str) -> Value {
    json!({
        "time": TIME_WINDOW,
        "resolution": "HOUR",
        "locale": "en-US",
        "comparisonItem": [{
            "geo": {},
            "complexKeywordsRestriction": keyword_restriction(keyword),
        }],
        "requestOptions": request_options(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(uri: &str) -> TrendFetcher {
        let config = TrendsConfig {
            base_url: Url::parse(&format!("{uri}/")).unwrap(),
            timeout: Duration::from_secs(5),
            ..TrendsConfig::default()
        };
        TrendFetcher::new(config).unwrap()
    }

    fn year() -> i32 {
        Local::now().year()
    }

    const RANKED_BOTH: &str = ")]}',\n{\"default\":{\"rankedList\":[\
        {\"rankedKeyword\":[{\"query\":\"gardening tools\"},{\"query\":\"garden centre\"}]},\
        {\"rankedKeyword\":[{\"query\":\"no dig gardening\",\"value\":350}]}]}}";

    const TIMELINE: &str = ")]}',\n{\"default\":{\"timelineData\":[\
        {\"formattedTime\":\"Oct 9 at 1:00 PM\",\"value\":[61]},\
        {\"formattedTime\":\"Oct 9 at 2:00 PM\",\"value\":[64]}]}}";

    #[test]
    fn test_request_filters_embed_keyword() {
        let req = related_request("home gardening");
        assert_eq!(
            req["restriction"]["complexKeywordsRestriction"]["keyword"][0]["value"],
            "home gardening"
        );
        assert_eq!(req["restriction"]["time"], "now 7-d");
        let req = multiline_request("home gardening");
        assert_eq!(req["resolution"], "HOUR");
        assert_eq!(
            req["comparisonItem"][0]["complexKeywordsRestriction"]["keyword"][0]["type"],
            "BROAD"
        );
    }

    #[tokio::test]
    async fn test_fetch_uses_real_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/relatedsearches"))
            .and(query_param("token", DEFAULT_TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_string(RANKED_BOTH))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/multiline"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TIMELINE))
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("gardening").await;
        assert_eq!(snap.related_queries(), ["gardening tools", "garden centre"]);
        assert_eq!(snap.rising_queries(), ["no dig gardening"]);
        assert_eq!(snap.interest_over_time().len(), 2);
        assert_eq!(snap.interest_over_time()[1].value, 64);
    }

    #[tokio::test]
    async fn test_fetch_sends_encoded_keyword() {
        let server = MockServer::start().await;
        let expected = related_request("ai tools").to_string();
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/relatedsearches"))
            .and(query_param("req", expected.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(RANKED_BOTH))
            .expect(1)
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("ai tools").await;
        assert_eq!(snap.related_queries()[0], "gardening tools");
    }

    #[tokio::test]
    async fn test_fetch_status_error_uses_fallback_queries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("gardening").await;
        assert_eq!(
            snap.related_queries(),
            synthetic::related_queries("gardening", year()).as_slice()
        );
        assert_eq!(snap.related_queries()[0], "gardening trends");
        assert_eq!(snap.related_queries()[1], "best gardening");
        assert_eq!(snap.rising_queries().len(), 8);
        assert_eq!(snap.interest_over_time().len(), 7);
    }

    #[tokio::test]
    async fn test_fetch_unframed_body_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"default\":{}}"))
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("yoga").await;
        assert_eq!(snap.related_queries()[0], "yoga trends");
        assert_eq!(snap.rising_queries()[0], "yoga AI");
    }

    #[tokio::test]
    async fn test_fetch_fills_only_the_empty_list() {
        let server = MockServer::start().await;
        let related_only = ")]}',\n{\"default\":{\"rankedList\":[\
            {\"rankedKeyword\":[{\"query\":\"gardening tools\"}]},{\"rankedKeyword\":[]}]}}";
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/relatedsearches"))
            .respond_with(ResponseTemplate::new(200).set_body_string(related_only))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/multiline"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TIMELINE))
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("gardening").await;
        assert_eq!(snap.related_queries(), ["gardening tools"]);
        assert_eq!(
            snap.rising_queries(),
            synthetic::rising_queries("gardening").as_slice()
        );
        assert_eq!(snap.interest_over_time().len(), 2);
    }

    #[tokio::test]
    async fn test_interest_fails_independently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/relatedsearches"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RANKED_BOTH))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/trends/api/widgetdata/multiline"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let snap = fetcher_for(&server.uri()).fetch("gardening").await;
        assert_eq!(snap.related_queries()[0], "gardening tools");
        let series = snap.interest_over_time();
        assert_eq!(series.len(), 7);
        assert_eq!(
            series[6].date,
            Local::now().date_naive().format("%Y-%m-%d").to_string()
        );
        assert!(series.iter().all(|p| (40..=100).contains(&p.value)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_never_fails() {
        // Nothing listens on the discard port.
        let fetcher = fetcher_for("http://127.0.0.1:9");
        let snap = fetcher.fetch("gardening").await;
        assert!(!snap.related_queries().is_empty());
        assert!(!snap.rising_queries().is_empty());
        assert_eq!(snap.keyword(), "gardening");
    }
}
