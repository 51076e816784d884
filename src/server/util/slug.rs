//! URL slug generation for catalogue entries.

use std::sync::LazyLock;

use regex::Regex;

static INVALID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Builds a URL slug from a display name.
///
/// Lowercases the name, drops every character outside `[a-z0-9]`, whitespace and `-`,
/// turns whitespace runs into single dashes, collapses repeated dashes and trims dashes
/// from both ends.
///
/// # Arguments
/// - `name` - Display name such as a product or category name
///
/// # Returns
/// - `String` - Slug, possibly empty when the name has no ASCII alphanumerics
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let stripped = INVALID_CHARS.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(stripped.trim(), "-");
    let collapsed = DASHES.replace_all(&dashed, "-");

    collapsed.trim_matches('-').to_string()
}

/// Appends a numeric suffix for the `attempt`-th collision.
///
/// Attempt 0 returns the base slug unchanged; attempt `n` returns `{base}-{n + 1}`.
pub fn with_suffix(base: &str, attempt: u32) -> String {
    match attempt {
        0 => base.to_string(),
        n => format!("{}-{}", base, n + 1),
    }
}
