//! Output sinks for generated artifacts.
//!
//! The pipeline hands each finished [`GeneratedArtifact`] to a [`Sink`] as
//! soon as it is produced. [`DirSink`] writes them into one directory:
//!
//! ```text
//! output_dir/
//! ├── gardening-article.md
//! ├── gardening-landing.html
//! └── gardening-trends.json
//! ```

pub mod json;

use crate::models::GeneratedArtifact;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for finished artifacts.
pub trait Sink {
    /// Persist `artifact`, returning where it went.
    async fn store(&self, artifact: &GeneratedArtifact) -> Result<PathBuf, SinkError>;
}

/// Writes each artifact to `<dir>/<slug><suffix>`, replacing existing files.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Sink for DirSink {
    #[instrument(level = "info", skip_all, fields(dir = %self.dir.display()))]
    async fn store(&self, artifact: &GeneratedArtifact) -> Result<PathBuf, SinkError> {
        let path = self.dir.join(artifact.file_name());
        if let Err(e) = fs::write(&path, &artifact.body).await {
            error!(path = %path.display(), error = %e, "Failed writing artifact");
            return Err(SinkError::Io { path, source: e });
        }
        info!(path = %path.display(), kind = ?artifact.kind, bytes = artifact.body.len(), "Saved artifact");
        Ok(path)
    }
}
