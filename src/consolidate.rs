//! Merge per-source rows into one entry per canonical team.
//!
//! The first record stored for a team becomes its consensus; later sources
//! only add to `by_source`. There is no voting or averaging.

use crate::models::{ConsolidatedTeam, Keyed, SourceResults};
use tracing::{debug, instrument};

/// Build the team map from `results`, visiting sources in insertion order.
///
/// Pure: the output depends only on `results`.
#[instrument(level = "info", skip_all, fields(sources = results.len()))]
pub fn consolidate(results: &SourceResults) -> Keyed<ConsolidatedTeam> {
    let mut teams: Keyed<ConsolidatedTeam> = Keyed::new();

    for (source_id, rows) in results.iter() {
        for row in rows {
            let name = row.team.as_str();
            match teams.get_mut(name) {
                Some(team) => team.by_source.insert(source_id, row.clone()),
                None => teams.insert(name, ConsolidatedTeam::new(name, source_id, row.clone())),
            }
        }
        debug!(source = source_id, rows = rows.len(), "Merged source");
    }

    teams
}
