//! Generic standings-table extractor.
//!
//! Given a [`SourceSpec`] and raw markup, find the standings rows with the
//! first locator that matches anything, then read each of the first
//! `max_rows` rows by the source's column offsets.
//!
//! Short rows are tolerated: a missing numeric cell reads as `"0"` and a
//! missing team cell as `"Equipo {i}"`. A row that cannot be read at all is
//! skipped on its own without affecting the others. An empty result means
//! "no data from this source", not an error.

use crate::models::RowRecord;
use crate::normalize::NameNormalizer;
use crate::scrapers::{LocatorKind, RowLocator, SourceSpec};
use crate::utils::parse_count;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("static selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));

/// A cell spanning this many columns marks a section divider, not a team.
const SEPARATOR_COLSPAN: usize = 3;

/// Text and span of one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    text: String,
    colspan: usize,
}

/// Why a single row was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A wide cell such as "Zona de Liguilla" splitting the table.
    #[error("section separator row: {0:?}")]
    Separator(String),
    /// Every cell is empty.
    #[error("row has no text")]
    Blank,
}

/// Extract up to `max_rows` standings rows from `markup`.
#[instrument(level = "info", skip_all, fields(source = %spec.id))]
pub fn extract(
    spec: &SourceSpec,
    markup: &str,
    normalizer: &NameNormalizer,
    max_rows: usize,
) -> Vec<RowRecord> {
    let document = Html::parse_document(markup);

    let Some((locator, rows)) = locate_rows(&document, &spec.locators) else {
        warn!(url = %spec.url, "No standings rows matched any selector");
        return Vec::new();
    };
    info!(selector = %locator.selector, found = rows.len(), "Located standings rows");

    let mut records = Vec::new();
    for (i, row) in rows.into_iter().take(max_rows).enumerate() {
        let index = i + 1;
        let cells = read_cells(row);
        if cells.len() < spec.min_cells {
            debug!(
                index,
                cells = cells.len(),
                min = spec.min_cells,
                "Row too short; not a data row"
            );
            continue;
        }
        match parse_row(index, &cells, spec, normalizer) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "Skipping row"),
        }
    }

    info!(rows = records.len(), "Extracted standings");
    records
}

/// First locator yielding at least one row, with its rows.
///
/// Selectors that fail to parse are logged and skipped.
fn locate_rows<'a, 'l>(
    document: &'a Html,
    locators: &'l [RowLocator],
) -> Option<(&'l RowLocator, Vec<ElementRef<'a>>)> {
    for locator in locators {
        let selector = match Selector::parse(&locator.selector) {
            Ok(s) => s,
            Err(e) => {
                warn!(selector = %locator.selector, error = %e, "Invalid selector; skipping");
                continue;
            }
        };
        let rows: Vec<ElementRef<'a>> = match locator.kind {
            LocatorKind::Rows => document.select(&selector).collect(),
            LocatorKind::Table => document
                .select(&selector)
                .next()
                .map(|table| table.select(&ROW).skip(1).collect())
                .unwrap_or_default(),
        };
        debug!(selector = %locator.selector, found = rows.len(), "Tried locator");
        if !rows.is_empty() {
            return Some((locator, rows));
        }
    }
    None
}

fn read_cells(row: ElementRef<'_>) -> Vec<Cell> {
    row.select(&CELL)
        .map(|cell| Cell {
            text: cell
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            colspan: cell
                .value()
                .attr("colspan")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1),
        })
        .collect()
}

fn parse_row(
    index: usize,
    cells: &[Cell],
    spec: &SourceSpec,
    normalizer: &NameNormalizer,
) -> Result<RowRecord, RowError> {
    if let Some(wide) = cells.iter().find(|c| c.colspan >= SEPARATOR_COLSPAN) {
        return Err(RowError::Separator(wide.text.clone()));
    }
    if cells.iter().all(|c| c.text.is_empty()) {
        return Err(RowError::Blank);
    }

    let text_at = |col: usize| cells.get(col).map(|c| c.text.as_str());
    let count_at = |col: Option<usize>| {
        col.and_then(text_at)
            .and_then(parse_count)
            .unwrap_or_else(|| "0".to_string())
    };

    let columns = &spec.columns;
    let team = match text_at(columns.team) {
        Some(raw) => normalizer.normalize(raw),
        None => format!("Equipo {index}"),
    };

    Ok(RowRecord {
        position: index.to_string(),
        team,
        points: count_at(Some(columns.points)),
        games_played: count_at(Some(columns.games)),
        wins: count_at(Some(columns.wins)),
        draws: count_at(Some(columns.draws)),
        losses: count_at(Some(columns.losses)),
        goal_differential: count_at(columns.goal_diff),
        source: spec.label.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::{espn, mediotiempo, ColumnMap};

    fn spec(locators: Vec<RowLocator>, min_cells: usize) -> SourceSpec {
        SourceSpec {
            id: "test".into(),
            label: "Test Source".into(),
            url: "https://example.test/".into(),
            locators,
            min_cells,
            columns: ColumnMap::default(),
        }
    }

    fn standings_html(rows: &[&str]) -> String {
        let body: String = rows.iter().map(|r| format!("<tr>{r}</tr>")).collect();
        format!(
            "<html><body><table><thead><tr><th>#</th><th>Equipo</th></tr></thead>\
             <tbody>{body}</tbody></table></body></html>"
        )
    }

    fn rows_of(spec: &SourceSpec, html: &str) -> Vec<RowRecord> {
        extract(spec, html, &NameNormalizer::default(), 18)
    }

    #[test]
    fn test_reads_full_row() {
        let html = standings_html(&[
            "<td>1</td><td><span>CHIVAS</span> <abbr>GDL</abbr></td><td>21</td><td>12</td><td>6</td><td>3</td><td>3</td><td>+5</td>",
        ]);
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 3), &html);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.team, "Guadalajara");
        assert_eq!(r.points, "21");
        assert_eq!(r.games_played, "12");
        assert_eq!((r.wins.as_str(), r.draws.as_str(), r.losses.as_str()), ("6", "3", "3"));
        assert_eq!(r.goal_differential, "5");
        assert_eq!(r.source, "Test Source");
        assert_eq!(r.position, "1");
    }

    #[test]
    fn test_short_rows_get_defaults() {
        let html = standings_html(&["<td>1</td>", "<td>2</td><td>Toluca</td><td>17</td>"]);
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 1), &html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team, "Equipo 1");
        assert_eq!(rows[0].points, "0");
        assert_eq!(rows[0].goal_differential, "0");
        assert_eq!(rows[1].team, "Toluca");
        assert_eq!(rows[1].points, "17");
        assert_eq!(rows[1].games_played, "0");
        assert_eq!(rows[1].losses, "0");
    }

    #[test]
    fn test_unparseable_numbers_default_to_zero() {
        let html = standings_html(&["<td>1</td><td>Atlas</td><td>--</td><td>12</td><td>x</td>"]);
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 3), &html);
        assert_eq!(rows[0].points, "0");
        assert_eq!(rows[0].games_played, "12");
        assert_eq!(rows[0].wins, "0");
    }

    #[test]
    fn test_rows_below_min_cells_are_skipped_but_keep_index() {
        let html = standings_html(&[
            "<td>ad</td>",
            "<td>2</td><td>Necaxa</td><td>13</td>",
        ]);
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 3), &html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team, "Necaxa");
        assert_eq!(rows[0].position, "2");
    }

    #[test]
    fn test_bad_row_is_isolated() {
        let html = standings_html(&[
            "<td>1</td><td>Puebla</td><td>12</td>",
            "<td colspan=\"8\">Zona de Liguilla</td>",
            "<td></td><td> </td><td></td>",
            "<td>4</td><td>Pachuca</td><td>14</td>",
        ]);
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 1), &html);
        let teams: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["Puebla", "Pachuca"]);
        assert_eq!(rows[1].position, "4");
    }

    #[test]
    fn test_row_errors_name_the_cause() {
        let s = spec(vec![RowLocator::rows("tr")], 1);
        let normalizer = NameNormalizer::default();
        let divider = [Cell {
            text: "Zona de Liguilla".into(),
            colspan: 8,
        }];
        let err = parse_row(3, &divider, &s, &normalizer).unwrap_err();
        assert_eq!(err, RowError::Separator("Zona de Liguilla".into()));
        assert_eq!(err.to_string(), "section separator row: \"Zona de Liguilla\"");

        let blank = [Cell {
            text: String::new(),
            colspan: 1,
        }];
        let err = parse_row(4, &blank, &s, &normalizer).unwrap_err();
        assert_eq!(err.to_string(), "row has no text");
    }

    #[test]
    fn test_first_matching_locator_wins() {
        let html = r#"
            <div class="tabla"><table><tr><td>1</td><td>Tigres</td><td>20</td></tr></table></div>
            <table class="other"><tbody><tr><td>1</td><td>Pumas</td><td>19</td></tr></tbody></table>
        "#;
        let s = spec(
            vec![
                RowLocator::rows(".missing tr"),
                RowLocator::rows("table.other tbody tr"),
                RowLocator::rows(".tabla tr"),
            ],
            3,
        );
        let rows = extract(&s, html, &NameNormalizer::default(), 18);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team, "Pumas UNAM");
    }

    #[test]
    fn test_table_locator_skips_header_row() {
        let html = r#"<table class="Table"><tr><th>Pos</th><th>Equipo</th><th>Pts</th></tr>
            <tr><td>1</td><td>Monterrey</td><td>22</td></tr></table>"#;
        let rows = rows_of(&spec(vec![RowLocator::table("table.Table")], 3), html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team, "Monterrey");
    }

    #[test]
    fn test_invalid_selector_is_skipped() {
        let html = standings_html(&["<td>1</td><td>León</td><td>16</td>"]);
        let s = spec(vec![RowLocator::rows("tr[[["), RowLocator::rows("tbody tr")], 3);
        let rows = extract(&s, &html, &NameNormalizer::default(), 18);
        assert_eq!(rows[0].team, "León");
    }

    #[test]
    fn test_caps_at_max_rows() {
        let cells: Vec<String> = (1..=25)
            .map(|i| format!("<td>{i}</td><td>Club {i}</td><td>{}</td>", 30 - i))
            .collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        let rows = rows_of(&spec(vec![RowLocator::rows("tbody tr")], 3), &standings_html(&refs));
        assert_eq!(rows.len(), 18);
        assert_eq!(rows[17].position, "18");
    }

    #[test]
    fn test_no_match_is_empty() {
        let rows = rows_of(&espn::source(), "<html><p>Access denied</p></html>");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_source_without_goal_diff_reports_zero() {
        let html = standings_html(&[
            "<td>1</td><td>Santos</td><td>18</td><td>12</td><td>5</td><td>3</td><td>4</td><td>7</td>",
        ]);
        let rows = extract(&mediotiempo::source(), &html, &NameNormalizer::default(), 18);
        assert_eq!(rows[0].team, "Santos Laguna");
        assert_eq!(rows[0].goal_differential, "0");
        assert_eq!(rows[0].losses, "4");
        assert_eq!(rows[0].source, "Medio Tiempo");
    }
}
