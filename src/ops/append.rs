//! Append a dated addendum to a document.
//!
//! Addenda are the one mutation allowed regardless of status: locked and
//! archived documents accept them, since the original sections stay intact.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::DocId;
use crate::core::{body, frontmatter, time};
use serde_yaml::Mapping;
use std::fs;
use std::path::PathBuf;

/// Fallback body when the caller supplies a title but no text.
const DEFAULT_BODY: &str = "[Add details here]";

/// Append an addendum titled `title` with body `text` to `id`, creating
/// the `## Addenda` section on first use. Returns the document path.
pub fn append_to_document(
    project: &Project,
    id: DocId,
    title: &str,
    text: &str,
) -> Result<PathBuf, PlanError> {
    let path = crate::core::locator::find_document(project, id, true)?;
    let mut content = fs::read_to_string(&path)?;

    if frontmatter::has_frontmatter(&content) {
        let mut patch = Mapping::new();
        patch.insert("modified".into(), time::today().into());
        content = frontmatter::update(&content, patch)?;
    }

    let text = if text.trim().is_empty() { DEFAULT_BODY } else { text };
    let content = body::append_addendum(&content, title, text);
    fs::write(&path, content)?;
    Ok(path)
}
