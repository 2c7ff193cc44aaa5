//! Fox Sports México standings.

use super::{ColumnMap, RowLocator, SourceSpec};

pub const ID: &str = "foxsports";
pub const URL: &str = "https://www.foxsports.com.mx/futbol/liga-mx/tabla-de-posiciones";

pub fn source() -> SourceSpec {
    SourceSpec {
        id: ID.to_string(),
        label: "Fox Sports MX".to_string(),
        url: URL.to_string(),
        locators: vec![RowLocator::rows(
            "table tbody tr, .standings-table tr, .tabla tr",
        )],
        min_cells: 3,
        columns: ColumnMap::default(),
    }
}
