//! JSON rendering of the raw trend snapshot.

use super::SinkError;
use crate::models::{ArtifactKind, GeneratedArtifact, TrendSnapshot};

/// Pretty-printed snapshot as a raw-data artifact.
pub fn snapshot_artifact(snapshot: &TrendSnapshot) -> Result<GeneratedArtifact, SinkError> {
    let body = serde_json::to_string_pretty(snapshot)?;
    Ok(GeneratedArtifact::new(
        ArtifactKind::RawData,
        snapshot.keyword(),
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InterestPoint;

    #[test]
    fn test_snapshot_artifact() {
        let snapshot = TrendSnapshot::new(
            "web dev",
            vec!["web dev trends".into()],
            vec!["web dev AI".into()],
            vec![InterestPoint {
                date: "2026-10-16".into(),
                value: 71,
            }],
            "2026-10-16T08:00:00.000Z".into(),
        );

        let artifact = snapshot_artifact(&snapshot).unwrap();
        assert_eq!(artifact.file_name(), "web-dev-trends.json");
        assert!(artifact.body.contains("\n  \"relatedQueries\": [\n"));

        let back: TrendSnapshot = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(back, snapshot);
    }
}
