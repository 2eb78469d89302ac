//! Record related-document links in frontmatter.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::DocId;
use crate::core::{frontmatter, locator, time};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct RelateOutcome {
    pub added: Vec<String>,
    pub already_present: Vec<String>,
    /// Documents skipped because they carry no frontmatter.
    pub skipped: Vec<String>,
}

/// Add `related_id` to the `related` list of the document at `path`.
/// Returns false when the link was already present. Documents without
/// frontmatter are left untouched.
fn add_related(path: &Path, related_id: &str) -> Result<Option<bool>, PlanError> {
    let content = fs::read_to_string(path)?;
    let (mapping, _) = frontmatter::parse(&content);
    if mapping.is_empty() {
        return Ok(None);
    }

    let mut related: Vec<Value> = match mapping.get("related") {
        Some(Value::Sequence(seq)) => seq.clone(),
        _ => Vec::new(),
    };
    let upper = related_id.to_uppercase();
    if related
        .iter()
        .filter_map(Value::as_str)
        .any(|existing| existing.eq_ignore_ascii_case(&upper))
    {
        return Ok(Some(false));
    }
    related.push(upper.into());

    let mut patch = Mapping::new();
    patch.insert("related".into(), Value::Sequence(related));
    patch.insert("modified".into(), time::today().into());
    let updated = frontmatter::update(&content, patch)?;
    fs::write(path, updated)?;
    Ok(Some(true))
}

/// Link `id` to each of `related` (ids validated and resolved first).
/// With `bidirectional`, the reverse link is recorded on each target too.
pub fn relate_documents(
    project: &Project,
    id: DocId,
    related: &[String],
    bidirectional: bool,
) -> Result<RelateOutcome, PlanError> {
    let path = locator::find_document(project, id, true)?;
    let mut outcome = RelateOutcome::default();

    // A frontmatter-less source is reported once, not once per target.
    let source_writable = frontmatter::has_frontmatter(&fs::read_to_string(&path)?);
    if !source_writable {
        outcome.skipped.push(id.to_string());
    }

    for raw in related {
        let target_id = DocId::parse(raw)?;
        let target_path = locator::find_document(project, target_id, true)?;

        if source_writable {
            match add_related(&path, &target_id.to_string())? {
                Some(true) => outcome.added.push(target_id.to_string()),
                Some(false) => outcome.already_present.push(target_id.to_string()),
                None => {}
            }
        }
        if bidirectional && add_related(&target_path, &id.to_string())?.is_none() {
            let skipped = target_id.to_string();
            if !outcome.skipped.contains(&skipped) {
                outcome.skipped.push(skipped);
            }
        }
    }
    Ok(outcome)
}
