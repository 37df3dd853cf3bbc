//! Common utility functions used across the crate

use std::path::Path;

/// Normalise transcript text for a pipe-delimited manifest.
/// Collapses every whitespace run (newlines included) into a single space,
/// drops a leading BOM and replaces the `|` delimiter with a space.
///
/// # Arguments
/// * `input` - Raw transcript text
///
/// # Returns
/// * The cleaned text, possibly empty
pub fn normalize_text(input: &str) -> String {
    input
        .trim_start_matches('\u{feff}')
        .replace('|', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if a file exists and has valid content (non-zero size)
pub async fn check_file_exists_and_valid(path: &Path) -> bool {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_file() && metadata.len() > 0 {
            return true;
        }
    }
    false
}

/// Lowercase extension of a path, without the leading dot.
pub fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
