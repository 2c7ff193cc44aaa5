//! Official Liga MX statistics page.

use super::{ColumnMap, RowLocator, SourceSpec};

pub const ID: &str = "ligamx_oficial";
pub const URL: &str = "https://www.ligamx.net/cancha/stats";

pub fn source() -> SourceSpec {
    SourceSpec {
        id: ID.to_string(),
        label: "Liga MX Oficial".to_string(),
        url: URL.to_string(),
        locators: vec![
            RowLocator::rows(".tabla-general tbody tr"),
            RowLocator::rows(".standings tbody tr"),
            RowLocator::rows("table tbody tr"),
            RowLocator::rows(".table-stats tbody tr"),
        ],
        min_cells: 4,
        columns: ColumnMap::default(),
    }
}
