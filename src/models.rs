//! Data models for standings rows and their consolidated representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RowRecord`]: One team's line as reported by one source
//! - [`Keyed`]: A small insertion-ordered string-keyed map
//! - [`SourceResults`]: Rows grouped by the source that produced them
//! - [`ConsolidatedTeam`]: Every record seen for one canonical team name
//! - [`PollSnapshot`]: The finished output of one polling cycle
//!
//! Field names on the wire follow the snapshot file format (`games`,
//! `goal_diff`, `sources`), hence the `serde(rename)` attributes.

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::utils::parse_count;

/// One team's result line from one source.
///
/// Numeric columns are kept as text. A missing or unreadable cell is stored
/// as `"0"` so that a partial row is still reported.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct RowRecord {
    /// 1-based rank, derived from the row's order in the source table.
    pub position: String,
    /// Canonical team name. Never empty.
    pub team: String,
    pub points: String,
    #[serde(rename = "games")]
    pub games_played: String,
    pub wins: String,
    pub draws: String,
    pub losses: String,
    #[serde(rename = "goal_diff")]
    pub goal_differential: String,
    /// Human-readable label of the source (e.g. `"ESPN MX"`).
    pub source: String,
}

impl RowRecord {
    /// Points as an integer; unreadable text counts as zero.
    pub fn points_value(&self) -> i64 {
        parse_count(&self.points).and_then(|p| p.parse().ok()).unwrap_or(0)
    }
}

/// A string-keyed map that remembers insertion order.
///
/// Serializes as a JSON object whose keys appear in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyed<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Keyed<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Keyed<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace. A replaced value keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Serialize> Serialize for Keyed<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Rows grouped by source id, in the order the sources were attempted.
pub type SourceResults = Keyed<Vec<RowRecord>>;

/// Every record seen for one canonical team name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConsolidatedTeam {
    pub name: String,
    #[serde(rename = "sources")]
    pub by_source: Keyed<RowRecord>,
    /// The first record stored for this team. Never recomputed.
    pub consensus: RowRecord,
}

impl ConsolidatedTeam {
    /// Start a team from its first observed record, which becomes the consensus.
    pub fn new(name: &str, source_id: &str, first: RowRecord) -> Self {
        let mut by_source = Keyed::new();
        by_source.insert(source_id, first.clone());
        Self {
            name: name.to_string(),
            by_source,
            consensus: first,
        }
    }
}

/// The state carried between polling cycles.
///
/// Built fresh every cycle and swapped in whole; never merged with the
/// previous cycle's data.
#[derive(Debug, Clone, Default)]
pub struct PollSnapshot {
    pub teams: Keyed<ConsolidatedTeam>,
    pub last_update: Option<DateTime<Local>>,
    /// Source ids that contributed to `teams`.
    pub sources_used: Vec<String>,
}

impl PollSnapshot {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// True when the only data came from the demonstration fallback.
    pub fn is_demo(&self) -> bool {
        !self.sources_used.is_empty()
            && self
                .sources_used
                .iter()
                .all(|s| s == crate::scrapers::demo::DEMO_SOURCE_ID)
    }
}

/// Minimal row used by tests across the crate.
#[cfg(test)]
pub(crate) fn sample_row(team: &str, points: &str, source: &str) -> RowRecord {
    RowRecord {
        position: "1".into(),
        team: team.into(),
        points: points.into(),
        games_played: "12".into(),
        wins: "0".into(),
        draws: "0".into(),
        losses: "0".into(),
        goal_differential: "0".into(),
        source: source.into(),
    }
}
