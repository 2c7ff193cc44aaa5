//! JSON snapshot file.
//!
//! The whole file is rewritten every successful cycle. It is pretty-printed
//! UTF-8 with non-ASCII team names kept as-is.

use crate::config::{ScraperConfig, SCRAPER_VERSION};
use crate::models::{ConsolidatedTeam, Keyed, PollSnapshot};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct SnapshotFile<'a> {
    last_update: Option<String>,
    total_teams: usize,
    teams: &'a Keyed<ConsolidatedTeam>,
    metadata: Metadata,
}

#[derive(Debug, Serialize)]
struct Metadata {
    scraper_version: &'static str,
    update_interval: String,
    sources_available: Vec<String>,
}

/// Serialize `snapshot` in the snapshot file layout.
pub fn to_json(
    snapshot: &PollSnapshot,
    config: &ScraperConfig,
) -> Result<String, serde_json::Error> {
    let file = SnapshotFile {
        last_update: snapshot.last_update.map(|ts| ts.to_rfc3339()),
        total_teams: snapshot.teams.len(),
        teams: &snapshot.teams,
        metadata: Metadata {
            scraper_version: SCRAPER_VERSION,
            update_interval: config.update_interval_label(),
            sources_available: config.source_ids(),
        },
    };
    serde_json::to_string_pretty(&file)
}

/// Overwrite `path` with the serialized snapshot.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_snapshot(
    snapshot: &PollSnapshot,
    config: &ScraperConfig,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let json = to_json(snapshot, config)?;
    fs::write(path, json).await?;
    info!(teams = snapshot.teams.len(), "Wrote snapshot file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;
    use crate::models::{sample_row, SourceResults};
    use chrono::Local;

    fn snapshot() -> PollSnapshot {
        let mut results = SourceResults::new();
        results.insert(
            "espn_mx",
            vec![sample_row("León", "16", "ESPN MX"), sample_row("Atlas", "15", "ESPN MX")],
        );
        PollSnapshot {
            teams: consolidate(&results),
            last_update: Some(Local::now()),
            sources_used: vec!["espn_mx".into()],
        }
    }

    #[test]
    fn test_layout() {
        let text = to_json(&snapshot(), &ScraperConfig::default()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["total_teams"], 2);
        assert!(v["last_update"].is_string());
        assert_eq!(v["metadata"]["scraper_version"], "2.0");
        assert_eq!(v["metadata"]["update_interval"], "1 minute");
        assert_eq!(v["metadata"]["sources_available"][0], "espn_mx");
        assert_eq!(v["teams"]["León"]["consensus"]["points"], "16");
        assert_eq!(v["teams"]["León"]["sources"]["espn_mx"]["source"], "ESPN MX");
    }

    #[test]
    fn test_keeps_unicode_and_order() {
        let text = to_json(&snapshot(), &ScraperConfig::default()).unwrap();
        assert!(text.contains("\"León\""));
        assert!(text.find("León").unwrap() < text.find("Atlas").unwrap());
        assert!(text.contains("\n  \"total_teams\""));
    }

    #[test]
    fn test_null_timestamp() {
        let text = to_json(&PollSnapshot::default(), &ScraperConfig::default()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(v["last_update"].is_null());
        assert_eq!(v["total_teams"], 0);
    }

    #[tokio::test]
    async fn test_write_overwrites_file() {
        let path = std::env::temp_dir().join(format!("liga_mx_table_{}.json", std::process::id()));
        tokio::fs::write(&path, "stale").await.unwrap();
        write_snapshot(&snapshot(), &ScraperConfig::default(), &path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.starts_with('{'));
        assert!(written.contains("\"Atlas\""));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
