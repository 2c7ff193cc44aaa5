//! Output generation for the console table and the JSON snapshot.
//!
//! # Submodules
//!
//! - [`table`]: Renders the standings as a fixed-width text table
//! - [`json`]: Writes the snapshot file consumed by other tools
//!
//! # Output Structure
//!
//! ```text
//! liga_mx_table.json
//! ├── last_update      ISO-8601 or null
//! ├── total_teams
//! ├── teams            { "<canonical name>": { name, sources, consensus } }
//! └── metadata         { scraper_version, update_interval, sources_available }
//! ```

pub mod json;
pub mod table;
