//! Console rendering of the standings.

use crate::models::{ConsolidatedTeam, PollSnapshot};
use itertools::Itertools;
use std::fmt::Write;

const RULE_WIDTH: usize = 90;

/// Teams ordered by points, highest first. Ties keep snapshot order.
pub fn ranked(snapshot: &PollSnapshot) -> Vec<&ConsolidatedTeam> {
    snapshot
        .teams
        .values()
        .sorted_by(|a, b| b.consensus.points_value().cmp(&a.consensus.points_value()))
        .collect()
}

/// The standings as text, at most `limit` rows, followed by the update time.
pub fn render(snapshot: &PollSnapshot, limit: usize) -> String {
    let mut out = String::new();
    if snapshot.is_empty() {
        out.push_str("No standings to show\n");
        return out;
    }

    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "LIGA MX STANDINGS");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:<5} {:<4} {:<3} {:<3} {:<3} {:<4} {:<12}",
        "Pos", "Team", "Pts", "GP", "W", "D", "L", "GD", "Source"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for (rank, team) in ranked(snapshot).into_iter().take(limit).enumerate() {
        let c = &team.consensus;
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<5} {:<4} {:<3} {:<3} {:<3} {:<4} {:<12}",
            rank + 1,
            c.team,
            c.points,
            c.games_played,
            c.wins,
            c.draws,
            c.losses,
            c.goal_differential,
            c.source
        );
    }

    let _ = writeln!(out, "{rule}");
    if let Some(ts) = snapshot.last_update {
        let _ = writeln!(out, "Last update: {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;
    use crate::models::{sample_row, SourceResults};

    fn snapshot(rows: &[(&str, &str)]) -> PollSnapshot {
        let mut results = SourceResults::new();
        results.insert(
            "espn_mx",
            rows.iter().map(|(t, p)| sample_row(t, p, "ESPN MX")).collect(),
        );
        PollSnapshot {
            teams: consolidate(&results),
            last_update: None,
            sources_used: vec!["espn_mx".into()],
        }
    }

    #[test]
    fn test_ranked_is_stable_descending() {
        let snap = snapshot(&[("Atlas", "10"), ("Toluca", "25"), ("Puebla", "10")]);
        let order: Vec<&str> = ranked(&snap).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["Toluca", "Atlas", "Puebla"]);
    }

    #[test]
    fn test_unreadable_points_sort_last() {
        let snap = snapshot(&[("Atlas", "?"), ("Toluca", "3")]);
        let order: Vec<&str> = ranked(&snap).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["Toluca", "Atlas"]);
    }

    #[test]
    fn test_render_lists_ranked_rows() {
        let snap = snapshot(&[("Atlas", "10"), ("Toluca", "25")]);
        let text = render(&snap, 18);
        let toluca = text.find("Toluca").unwrap();
        let atlas = text.find("Atlas").unwrap();
        assert!(toluca < atlas);
        assert!(text.contains("1    Toluca"));
        assert!(text.contains("ESPN MX"));
    }

    #[test]
    fn test_render_respects_limit() {
        let snap = snapshot(&[("Atlas", "10"), ("Toluca", "25"), ("Puebla", "1")]);
        let text = render(&snap, 2);
        assert!(!text.contains("Puebla"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&PollSnapshot::default(), 18), "No standings to show\n");
    }
}
