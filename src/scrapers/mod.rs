//! Standings sources and the markup extractor shared by all of them.
//!
//! Each source is plain data: a URL, an ordered list of row locators and a
//! column layout. The generic extractor in [`table`] turns any of them into
//! [`RowRecord`](crate::models::RowRecord)s, so adding a site means adding a
//! [`SourceSpec`], not code.
//!
//! # Built-in Sources
//!
//! | Source | Module | Min cells | Goal differential |
//! |--------|--------|-----------|-------------------|
//! | ESPN México | [`espn`] | 6 | column 7 |
//! | Liga MX (official site) | [`ligamx`] | 4 | column 7 |
//! | Fox Sports México | [`foxsports`] | 3 | column 7 |
//! | Medio Tiempo | [`mediotiempo`] | 3 | not published |
//!
//! [`demo`] holds the static table used when every source fails.

pub mod demo;
pub mod espn;
pub mod foxsports;
pub mod ligamx;
pub mod mediotiempo;
pub mod table;

use serde::{Deserialize, Serialize};

/// How a locator's selector is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    /// The selector matches the rows themselves.
    #[default]
    Rows,
    /// The selector matches a table; its `tr` rows minus the header row are used.
    Table,
}

/// One structural guess at where the standings rows live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLocator {
    pub selector: String,
    #[serde(default)]
    pub kind: LocatorKind,
}

impl RowLocator {
    pub fn rows(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            kind: LocatorKind::Rows,
        }
    }

    pub fn table(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            kind: LocatorKind::Table,
        }
    }
}

/// Zero-based cell offsets of each field within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub team: usize,
    pub points: usize,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// `None` when the source does not publish goal differential.
    pub goal_diff: Option<usize>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            team: 1,
            points: 2,
            games: 3,
            wins: 4,
            draws: 5,
            losses: 6,
            goal_diff: Some(7),
        }
    }
}

fn default_min_cells() -> usize {
    3
}

/// Everything needed to fetch and read one standings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Stable key used in results and the snapshot file.
    pub id: String,
    /// Shown in the `source` column.
    pub label: String,
    pub url: String,
    /// Tried in order; the first one matching at least one row is used.
    pub locators: Vec<RowLocator>,
    /// Matched rows with fewer cells are treated as non-data and skipped.
    #[serde(default = "default_min_cells")]
    pub min_cells: usize,
    #[serde(default)]
    pub columns: ColumnMap,
}

/// The built-in sources in priority order.
pub fn builtin_sources() -> Vec<SourceSpec> {
    vec![
        espn::source(),
        ligamx::source(),
        foxsports::source(),
        mediotiempo::source(),
    ]
}
