//! Utility functions for text cleanup and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Title-casing for team names no alias recognises
//! - Numeric cell sanitizing for standings columns
//! - String truncation for logging response bodies
//! - File system validation for the snapshot location

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Leading signed integer in a cell, e.g. `+5`, `-3`, `−2`, `25 pts`.
static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+\-\x{2212}]?)\s*(\d+)").expect("static regex"));

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a char boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Title-case every word: the first letter of each alphabetic run is
/// uppercased and the rest lowercased.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(title_case("club deportivo x"), "Club Deportivo X");
/// assert_eq!(title_case("o'higgins-fc"), "O'Higgins-Fc");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Read the signed integer at the start of a standings cell.
///
/// Returns the canonical text of the number (`"+5"` becomes `"5"`, the
/// Unicode minus becomes `-`), or `None` if the cell does not start with one.
pub fn parse_count(cell: &str) -> Option<String> {
    let caps = LEADING_INT.captures(cell)?;
    let digits = caps.get(2)?.as_str().trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    let negative = matches!(caps.get(1).map(|m| m.as_str()), Some("-") | Some("\u{2212}"));
    if negative && digits != "0" {
        Some(format!("-{digits}"))
    } else {
        Some(digits.to_string())
    }
}

/// Ensure the directory holding `file` exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %file.display()))]
pub async fn ensure_writable_parent(file: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = dir.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(dir = %dir.display(), "Output directory is writable");
    Ok(())
}
