//! Display names for cache entries.

use dz_model::CacheKey;

/// Longest file name shown before truncation.
pub const MAX_DISPLAY_CHARS: usize = 20;

/// File name as shown in entry listings: long names are cut to
/// [`MAX_DISPLAY_CHARS`] characters followed by `...`.
pub fn display_name(filename: &str) -> String {
    if filename.chars().count() > MAX_DISPLAY_CHARS {
        let head: String = filename.chars().take(MAX_DISPLAY_CHARS).collect();
        format!("{head}...")
    } else {
        filename.to_string()
    }
}

/// Name for a table combined from two entries, e.g. `merged_1a2b_9f8e`.
pub fn combined_name(prefix: &str, main: &CacheKey, other: &CacheKey) -> String {
    format!("{prefix}_{}_{}", main.short(), other.short())
}
