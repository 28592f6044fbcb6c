//! Slug derivation
//!
//! Category and tag identifiers are derived from their display name:
//! lowercase, whitespace runs become single hyphens, and anything that is
//! not `a-z`, `0-9`, or `-` is stripped.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

/// Derive a slug identifier from a display name.
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    DISALLOWED.replace_all(&hyphenated, "").into_owned()
}
