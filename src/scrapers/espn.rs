//! ESPN México standings.
//!
//! ESPN renders its tables with generated `Table` classes; older layouts
//! used a `standings-table` wrapper. Both are covered, most specific first.

use super::{ColumnMap, RowLocator, SourceSpec};

pub const ID: &str = "espn_mx";
pub const URL: &str = "https://www.espn.com.mx/futbol/posiciones/_/liga/mex.1";

pub fn source() -> SourceSpec {
    SourceSpec {
        id: ID.to_string(),
        label: "ESPN MX".to_string(),
        url: URL.to_string(),
        locators: vec![
            RowLocator::table("table.Table--align-right"),
            RowLocator::table("table.Table"),
            RowLocator::rows(".Table__TBODY tr"),
            RowLocator::rows("tbody tr"),
            RowLocator::rows(".standings-table tbody tr"),
            RowLocator::rows("table tbody tr"),
        ],
        min_cells: 6,
        columns: ColumnMap::default(),
    }
}
