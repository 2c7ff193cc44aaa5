//! Runtime configuration.
//!
//! Every option has a default, so the scraper runs with no file at all. A
//! YAML file passed with `--config` overrides any subset of fields, and CLI
//! flags override the file.
//!
//! ```yaml
//! poll_interval_secs: 180
//! min_viable_rows: 10
//! output_path: /var/lib/liga_mx/liga_mx_table.json
//! fetch:
//!   attempts: 4
//!   accept_invalid_certs: true
//! sources:
//!   - id: espn_mx
//!     label: ESPN MX
//!     url: https://www.espn.com.mx/futbol/posiciones/_/liga/mex.1
//!     min_cells: 6
//!     locators:
//!       - { selector: "table.Table", kind: table }
//!       - { selector: "tbody tr" }
//! ```

use crate::chain::ChainLimits;
use crate::fetch::FetchPolicy;
use crate::normalize::{default_aliases, NameAlias};
use crate::scrapers::{builtin_sources, SourceSpec};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};
use url::Url;

/// Reported in the snapshot metadata.
pub const SCRAPER_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Time between the end of one cycle and the start of the next.
    pub poll_interval_secs: u64,
    /// Granularity of the cancellable inter-cycle wait.
    pub countdown_step_secs: u64,
    pub min_viable_rows: usize,
    pub max_teams: usize,
    pub output_path: PathBuf,
    pub demo_fallback: bool,
    /// Fixes delays, header picks and demo goal differences for reproducible runs.
    pub rng_seed: Option<u64>,
    pub fetch: FetchPolicy,
    /// In priority order.
    pub sources: Vec<SourceSpec>,
    /// In match order.
    pub name_aliases: Vec<NameAlias>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            countdown_step_secs: 5,
            min_viable_rows: 10,
            max_teams: 18,
            output_path: PathBuf::from("liga_mx_table.json"),
            demo_fallback: true,
            rng_seed: None,
            fetch: FetchPolicy::default(),
            sources: builtin_sources(),
            name_aliases: default_aliases(),
        }
    }
}

impl ScraperConfig {
    /// Read a YAML file. Call [`validate`](Self::validate) once CLI overrides are applied.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(sources = config.sources.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reject settings the pipeline cannot run with; warn about suspicious ones.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than zero".into());
        }
        if self.countdown_step_secs == 0 {
            return Err("countdown_step_secs must be greater than zero".into());
        }
        if self.fetch.attempts == 0 {
            return Err("fetch.attempts must be at least 1".into());
        }
        if self.sources.is_empty() && !self.demo_fallback {
            return Err("no sources configured and demo fallback disabled".into());
        }
        for source in &self.sources {
            Url::parse(&source.url).map_err(|e| {
                format!("source {:?} has invalid url {:?}: {e}", source.id, source.url)
            })?;
            if source.locators.is_empty() {
                return Err(format!("source {:?} has no locators", source.id).into());
            }
        }
        for dup in self.sources.iter().map(|s| s.id.as_str()).duplicates() {
            warn!(source = dup, "Duplicate source id; later entries shadow earlier results");
        }
        if self.min_viable_rows > self.max_teams {
            warn!(
                min = self.min_viable_rows,
                max = self.max_teams,
                "min_viable_rows exceeds max_teams; no source can be accepted"
            );
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn countdown_step(&self) -> Duration {
        Duration::from_secs(self.countdown_step_secs)
    }

    pub fn chain_limits(&self) -> ChainLimits {
        ChainLimits {
            min_viable_rows: self.min_viable_rows,
            max_teams: self.max_teams,
            demo_fallback: self.demo_fallback,
        }
    }

    pub fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }

    /// Human form of the poll interval, e.g. `"1 minute"`, `"3 minutes"`, `"90 seconds"`.
    pub fn update_interval_label(&self) -> String {
        let secs = self.poll_interval_secs;
        match (secs % 60, secs / 60) {
            (0, 1) => "1 minute".to_string(),
            (0, m) => format!("{m} minutes"),
            (_, _) if secs == 1 => "1 second".to_string(),
            _ => format!("{secs} seconds"),
        }
    }
}
