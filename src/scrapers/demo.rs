//! Static demonstration standings, used only when every real source fails.

use crate::entropy::Entropy;
use crate::models::RowRecord;

pub const DEMO_SOURCE_ID: &str = "demo_data";
pub const DEMO_LABEL: &str = "Demo Data";

/// (team, points, games, wins, draws, losses)
const DEMO_TABLE: [(&str, u32, u32, u32, u32, u32); 18] = [
    ("Club América", 25, 12, 8, 1, 3),
    ("Cruz Azul", 23, 12, 7, 2, 3),
    ("Monterrey", 22, 12, 7, 1, 4),
    ("Guadalajara", 21, 12, 6, 3, 3),
    ("Tigres UANL", 20, 12, 6, 2, 4),
    ("Pumas UNAM", 19, 12, 6, 1, 5),
    ("Santos Laguna", 18, 12, 5, 3, 4),
    ("Toluca", 17, 12, 5, 2, 5),
    ("León", 16, 12, 5, 1, 6),
    ("Atlas", 15, 12, 4, 3, 5),
    ("Pachuca", 14, 12, 4, 2, 6),
    ("Necaxa", 13, 12, 4, 1, 7),
    ("Puebla", 12, 12, 3, 3, 6),
    ("Tijuana", 11, 12, 3, 2, 7),
    ("Mazatlán FC", 10, 12, 3, 1, 8),
    ("Querétaro", 9, 12, 2, 3, 7),
    ("Juárez", 8, 12, 2, 2, 8),
    ("Atlético San Luis", 7, 12, 2, 1, 9),
];

/// The 18 demo rows. Goal differential is random in [-10, 15], for display only.
pub fn demo_rows(rng: &mut impl Entropy) -> Vec<RowRecord> {
    DEMO_TABLE
        .iter()
        .enumerate()
        .map(|(i, &(team, points, games, wins, draws, losses))| RowRecord {
            position: (i + 1).to_string(),
            team: team.to_string(),
            points: points.to_string(),
            games_played: games.to_string(),
            wins: wins.to_string(),
            draws: draws.to_string(),
            losses: losses.to_string(),
            goal_differential: rng.int_between(-10, 15).to_string(),
            source: DEMO_LABEL.to_string(),
        })
        .collect()
}
