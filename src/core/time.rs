//! Shared date/text helpers for document metadata and body sections.

use chrono::Local;

/// Returns today's date in ISO format (e.g. `2026-08-29`).
///
/// Every `created`/`modified` stamp and dated addendum heading goes
/// through here.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Title-case a status value for the human-readable `## Status` section
/// (`in progress` -> `In Progress`). Frontmatter keeps the lowercase form.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
