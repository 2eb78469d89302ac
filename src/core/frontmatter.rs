//! YAML frontmatter codec.
//!
//! Splits the delimited metadata block from body text and renders it back.
//! Parsing fails open: content without frontmatter — or with a malformed
//! block — yields an empty mapping and the original, undivided content, so
//! callers always receive a well-typed mapping instead of a parse error.

use crate::core::error::PlanError;
use crate::core::time;
use crate::core::types::DocId;
use serde_yaml::{Mapping, Value};

const DELIM: &str = "---\n";
const CLOSE: &str = "\n---\n";

/// Marker inserted once, before the first addendum.
pub const ADDENDA_SEPARATOR: &str = "\n\n---\n\n## Addenda\n";

/// Split a document into (frontmatter, body).
///
/// The mapping preserves key order. When no valid frontmatter block is
/// present the mapping is empty and the body is the full input.
pub fn parse(content: &str) -> (Mapping, String) {
    let Some(rest) = content.strip_prefix(DELIM) else {
        return (Mapping::new(), content.to_string());
    };
    let Some(end) = rest.find(CLOSE) else {
        return (Mapping::new(), content.to_string());
    };
    let yaml_text = &rest[..end];
    let body = &rest[end + CLOSE.len()..];
    match serde_yaml::from_str::<Mapping>(yaml_text) {
        Ok(mapping) => (mapping, body.to_string()),
        // Malformed block: degrade to "no frontmatter", keep content intact.
        Err(_) => (Mapping::new(), content.to_string()),
    }
}

pub fn has_frontmatter(content: &str) -> bool {
    let (mapping, _) = parse(content);
    !mapping.is_empty()
}

/// Render a mapping back inside `---` delimiters.
///
/// Key insertion order is preserved; absent references render as `null`
/// and empty relation lists as `[]`.
pub fn render(mapping: &Mapping) -> Result<String, PlanError> {
    let yaml = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Parse, shallow-merge `patch` over the metadata (patch keys win),
/// re-render, and re-concatenate with the original body.
pub fn update(content: &str, patch: Mapping) -> Result<String, PlanError> {
    let (mut mapping, body) = parse(content);
    for (key, value) in patch {
        mapping.insert(key, value);
    }
    Ok(render(&mapping)? + &body)
}

/// Fetch a string-valued field, if present and non-null.
pub fn get_str<'a>(mapping: &'a Mapping, field: &str) -> Option<&'a str> {
    mapping.get(field).and_then(Value::as_str)
}

/// Standard frontmatter for a newly created document, in schema key order.
pub fn new_document_mapping(id: DocId, supersedes: Option<&str>) -> Mapping {
    let today = time::today();
    let mut mapping = Mapping::new();
    mapping.insert("type".into(), id.ty.key().into());
    mapping.insert("id".into(), id.to_string().into());
    mapping.insert("status".into(), id.ty.spec().statuses.initial.into());
    mapping.insert("created".into(), today.clone().into());
    mapping.insert("modified".into(), today.into());
    mapping.insert(
        "supersedes".into(),
        supersedes.map(Value::from).unwrap_or(Value::Null),
    );
    mapping.insert("superseded_by".into(), Value::Null);
    mapping.insert("obsoleted_by".into(), Value::Null);
    mapping.insert("related".into(), Value::Sequence(Vec::new()));
    mapping
}
