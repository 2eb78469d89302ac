//! Parser for the fixed markdown body grammar.
//!
//! Planning documents share a small conventional shape below the
//! frontmatter: an H1 title, a `## Status` section holding a single-line
//! value, optional `## Date`/`## Created` and `## Archived` sections, and
//! an append-only `## Addenda` section introduced by a horizontal rule.
//! This module walks the text once and returns a typed, partially
//! populated outline with byte spans for the pieces operations rewrite.

use crate::core::error::PlanError;
use crate::core::frontmatter::ADDENDA_SEPARATOR;
use crate::core::time;
use crate::core::types::DocType;
use std::ops::Range;

/// A single-line section value plus the byte span it occupies.
#[derive(Debug, Clone)]
pub struct SectionValue {
    pub value: String,
    /// Span of the value text itself (excludes its trailing newline).
    pub span: Range<usize>,
    /// Offset just past the value line's newline; insertion point for
    /// sections that follow the status.
    pub line_end: usize,
}

/// Typed outline of a document body. Absent sections stay `None`.
#[derive(Debug, Clone, Default)]
pub struct BodyOutline {
    pub title: Option<String>,
    pub status: Option<SectionValue>,
    /// First `## Date` or `## Created` ISO value.
    pub date: Option<String>,
    pub archived: Option<String>,
    pub has_addenda: bool,
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter().enumerate().all(|(i, c)| {
            if i == 4 || i == 7 { *c == b'-' } else { c.is_ascii_digit() }
        })
}

/// Strip an `ADR-001: ` style id prefix from an H1 title.
fn strip_id_prefix(title: &str) -> &str {
    for ty in DocType::all() {
        let prefix = ty.spec().id_prefix;
        if let Some(rest) = title.strip_prefix(prefix) {
            if let Some(rest) = rest.strip_prefix('-') {
                let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
                if digits > 0 {
                    if let Some(rest) = rest[digits..].strip_prefix(':') {
                        return rest.trim_start();
                    }
                }
            }
        }
    }
    title
}

/// Walk the body once and collect the outline.
pub fn parse(body: &str) -> BodyOutline {
    #[derive(PartialEq)]
    enum Expect {
        Nothing,
        Status,
        Date,
        Archived,
    }

    let mut outline = BodyOutline::default();
    let mut expect = Expect::Nothing;
    let mut offset = 0usize;

    for line in body.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        let trimmed = text.trim();

        if let Some(heading) = text.strip_prefix("## ") {
            let heading = heading.trim();
            expect = match heading {
                "Status" => Expect::Status,
                "Date" | "Created" => Expect::Date,
                "Archived" => Expect::Archived,
                _ => Expect::Nothing,
            };
            if heading.eq_ignore_ascii_case("addenda") {
                outline.has_addenda = true;
                expect = Expect::Nothing;
            }
        } else if text.starts_with('#') {
            if outline.title.is_none() {
                if let Some(h1) = text.strip_prefix("# ") {
                    outline.title = Some(strip_id_prefix(h1.trim()).to_string());
                }
            }
            expect = Expect::Nothing;
        } else if !trimmed.is_empty() && expect != Expect::Nothing {
            match expect {
                Expect::Status if outline.status.is_none() => {
                    let start = offset + (text.len() - text.trim_start().len());
                    outline.status = Some(SectionValue {
                        value: trimmed.to_string(),
                        span: start..start + trimmed.len(),
                        line_end: offset + line.len(),
                    });
                }
                Expect::Date if outline.date.is_none() && is_iso_date(trimmed) => {
                    outline.date = Some(trimmed.to_string());
                }
                Expect::Archived if outline.archived.is_none() => {
                    outline.archived = Some(trimmed.to_string());
                }
                _ => {}
            }
            expect = Expect::Nothing;
        }

        offset += line.len();
    }

    outline
}

/// Replace the `## Status` value with `display` (already title-cased).
///
/// Fails with `MalformedDocument` when the body carries no status section.
pub fn set_status(body: &str, display: &str) -> Result<String, PlanError> {
    let outline = parse(body);
    let status = outline.status.ok_or_else(|| {
        PlanError::MalformedDocument("could not find a ## Status section".to_string())
    })?;
    let mut out = String::with_capacity(body.len() + display.len());
    out.push_str(&body[..status.span.start]);
    out.push_str(display);
    out.push_str(&body[status.span.end..]);
    Ok(out)
}

/// Insert an `## Archived` section (dated today) directly after the status
/// section. No-op when one is already present or no status section exists.
pub fn insert_archived_marker(body: &str) -> String {
    let outline = parse(body);
    if outline.archived.is_some() {
        return body.to_string();
    }
    let Some(status) = outline.status else {
        return body.to_string();
    };
    let marker = format!("\n## Archived\n\n{}\n", time::today());
    let mut out = String::with_capacity(body.len() + marker.len());
    out.push_str(&body[..status.line_end]);
    out.push_str(&marker);
    out.push_str(&body[status.line_end..]);
    out
}

/// Append a dated addendum subsection, creating the Addenda marker (with
/// its preceding horizontal rule) on first use. Entries are never merged or
/// deduplicated; the section is append-only by design.
pub fn append_addendum(content: &str, title: &str, text: &str) -> String {
    let entry = format!("\n### {}: {}\n\n{}\n", time::today(), title, text);
    if parse(content).has_addenda {
        format!("{}{}", content.trim_end(), entry)
    } else {
        format!(
            "{}{}{}",
            content.trim_end(),
            ADDENDA_SEPARATOR,
            entry.trim_start_matches('\n')
        )
    }
}
