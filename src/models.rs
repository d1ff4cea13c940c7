//! Data models for trend lookups and the content derived from them.
//!
//! - [`TrendSnapshot`]: the immutable result of one trend lookup, real or synthetic
//! - [`ContentRequest`]: what the content generator works from
//! - [`GeneratedArtifact`]: one finished output file, handed straight to a sink
//!
//! Serialized field names use camelCase so the raw data dump keeps the shape
//! downstream consumers already read.

use crate::utils::slugify_keyword;
use serde::{Deserialize, Serialize};

/// Upper bound on related and rising queries kept from one lookup.
pub const MAX_QUERIES: usize = 10;

/// One point of the interest-over-time series.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterestPoint {
    /// Provider-formatted time for real data, `YYYY-MM-DD` for synthetic data.
    pub date: String,
    /// Relative interest, 0-100.
    pub value: i64,
}

/// Result of one trend lookup.
///
/// Both query lists are non-empty for every snapshot handed out by
/// [`crate::trends::TrendFetcher`]; the constructor is crate-private so that
/// guarantee cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSnapshot {
    keyword: String,
    related_queries: Vec<String>,
    rising_queries: Vec<String>,
    interest_over_time: Vec<InterestPoint>,
    #[serde(rename = "timestamp")]
    fetched_at: String,
}

impl TrendSnapshot {
    pub(crate) fn new(
        keyword: &str,
        related_queries: Vec<String>,
        rising_queries: Vec<String>,
        interest_over_time: Vec<InterestPoint>,
        fetched_at: String,
    ) -> Self {
        debug_assert!(!related_queries.is_empty() && !rising_queries.is_empty());
        Self {
            keyword: keyword.to_string(),
            related_queries,
            rising_queries,
            interest_over_time,
            fetched_at,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn related_queries(&self) -> &[String] {
        &self.related_queries
    }

    pub fn rising_queries(&self) -> &[String] {
        &self.rising_queries
    }

    pub fn interest_over_time(&self) -> &[InterestPoint] {
        &self.interest_over_time
    }

    /// RFC-3339 creation time.
    pub fn fetched_at(&self) -> &str {
        &self.fetched_at
    }

    /// Related queries followed by rising queries, truncated to `limit`.
    pub fn combined_queries(&self, limit: usize) -> Vec<String> {
        self.related_queries
            .iter()
            .chain(self.rising_queries.iter())
            .take(limit)
            .cloned()
            .collect()
    }
}

/// Input to the content generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub keyword: String,
    /// Related then rising queries, already capped to the caller's limit.
    pub related_keywords: Vec<String>,
    pub include_article: bool,
    pub include_landing_page: bool,
}

impl ContentRequest {
    pub const DEFAULT_LIMIT: usize = 5;

    pub fn from_snapshot(
        snapshot: &TrendSnapshot,
        limit: usize,
        include_article: bool,
        include_landing_page: bool,
    ) -> Self {
        Self {
            keyword: snapshot.keyword().to_string(),
            related_keywords: snapshot.combined_queries(limit),
            include_article,
            include_landing_page,
        }
    }

    /// At most `n` related keywords.
    pub fn related(&self, n: usize) -> &[String] {
        &self.related_keywords[..self.related_keywords.len().min(n)]
    }
}

/// Kind of a generated output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Article,
    LandingPage,
    RawData,
}

impl ArtifactKind {
    /// Fixed filename suffix appended to the keyword slug.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Article => "-article.md",
            ArtifactKind::LandingPage => "-landing.html",
            ArtifactKind::RawData => "-trends.json",
        }
    }
}

/// One finished output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub filename_slug: String,
    pub body: String,
}

impl GeneratedArtifact {
    pub fn new(kind: ArtifactKind, keyword: &str, body: String) -> Self {
        Self {
            kind,
            filename_slug: slugify_keyword(keyword),
            body,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.filename_slug, self.kind.suffix())
    }
}
