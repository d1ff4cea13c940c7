//! End-to-end run for one keyword.
//!
//! 1. **Trends**: fetch a [`TrendSnapshot`] (never fails)
//! 2. **Request**: related then rising queries, capped to the limit
//! 3. **Generation**: article and/or landing page, concurrently
//! 4. **Output**: each artifact goes to the sink, then the raw snapshot
//!
//! The fetcher and generator absorb their own failures. Anything that does
//! reach this level (bad options, a sink that cannot write) aborts the run.

use crate::content::ContentGenerator;
use crate::models::{ArtifactKind, ContentRequest, GeneratedArtifact, TrendSnapshot};
use crate::outputs::{Sink, SinkError, json};
use crate::trends::TrendFetcher;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("keyword must not be empty")]
    EmptyKeyword,

    #[error("neither an article nor a landing page was requested")]
    NothingRequested,

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// What to produce for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub include_article: bool,
    pub include_landing_page: bool,
    pub limit: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            include_article: true,
            include_landing_page: true,
            limit: ContentRequest::DEFAULT_LIMIT,
        }
    }
}

/// Fetcher, generator and sink wired together.
#[derive(Debug)]
pub struct Pipeline<S> {
    fetcher: TrendFetcher,
    generator: ContentGenerator,
    sink: S,
}

impl<S: Sink> Pipeline<S> {
    pub fn new(fetcher: TrendFetcher, generator: ContentGenerator, sink: S) -> Self {
        Self {
            fetcher,
            generator,
            sink,
        }
    }

    /// Produce and store every requested artifact plus the raw snapshot.
    ///
    /// Returns the stored paths in write order.
    #[instrument(level = "info", skip(self))]
    pub async fn run(&self, keyword: &str, opts: RunOptions) -> Result<Vec<PathBuf>, RunError> {
        if keyword.trim().is_empty() {
            return Err(RunError::EmptyKeyword);
        }
        if !opts.include_article && !opts.include_landing_page {
            return Err(RunError::NothingRequested);
        }

        let t0 = Instant::now();
        info!("Generating content");

        let snapshot = self.fetcher.fetch(keyword).await;
        debug!(
            related = snapshot.related_queries().len(),
            rising = snapshot.rising_queries().len(),
            interest_points = snapshot.interest_over_time().len(),
            fetched_at = snapshot.fetched_at(),
            "Snapshot received"
        );
        let req = ContentRequest::from_snapshot(
            &snapshot,
            opts.limit,
            opts.include_article,
            opts.include_landing_page,
        );
        info!(related = ?req.related_keywords, "Content request built");

        let (article, landing) = futures::join!(
            async {
                if req.include_article {
                    Some(self.generator.generate_article(&req).await)
                } else {
                    None
                }
            },
            async {
                if req.include_landing_page {
                    Some(self.generator.generate_landing_page(&req).await)
                } else {
                    None
                }
            },
        );

        let mut written = Vec::with_capacity(3);
        if let Some(body) = article {
            let artifact = GeneratedArtifact::new(ArtifactKind::Article, keyword, body);
            written.push(self.sink.store(&artifact).await?);
        }
        if let Some(body) = landing {
            let artifact = GeneratedArtifact::new(ArtifactKind::LandingPage, keyword, body);
            written.push(self.sink.store(&artifact).await?);
        }
        written.push(self.store_snapshot(&snapshot).await?);

        let elapsed = t0.elapsed();
        info!(
            files = ?written,
            elapsed_ms = elapsed.as_millis() as u64,
            "Content generation completed"
        );
        Ok(written)
    }

    async fn store_snapshot(&self, snapshot: &TrendSnapshot) -> Result<PathBuf, RunError> {
        let artifact = json::snapshot_artifact(snapshot)?;
        Ok(self.sink.store(&artifact).await?)
    }
}
