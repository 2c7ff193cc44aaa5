//! Medio Tiempo standings. The table has no goal differential column.

use super::{ColumnMap, RowLocator, SourceSpec};

pub const ID: &str = "medio_tiempo";
pub const URL: &str = "https://www.mediotiempo.com/futbol/liga-mx/tabla-posiciones";

pub fn source() -> SourceSpec {
    SourceSpec {
        id: ID.to_string(),
        label: "Medio Tiempo".to_string(),
        url: URL.to_string(),
        locators: vec![RowLocator::rows(
            "table tbody tr, .tabla-posiciones tr, .standings tr",
        )],
        min_cells: 3,
        columns: ColumnMap {
            goal_diff: None,
            ..ColumnMap::default()
        },
    }
}
