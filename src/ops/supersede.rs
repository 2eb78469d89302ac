//! Supersede a document: create a replacement and cross-link the pair.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::DocId;
use crate::core::{body, frontmatter, locator, time};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Supersession {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub new_id: String,
}

/// Display id of a freshly created document: frontmatter `id` when
/// present, otherwise reconstructed from the filename number.
fn document_id(path: &Path, content: &str, id: DocId) -> String {
    let (mapping, _) = frontmatter::parse(content);
    if let Some(doc_id) = frontmatter::get_str(&mapping, "id") {
        return doc_id.to_string();
    }
    let spec = id.ty.spec();
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|name| spec.filename_pattern().captures(name)?[1].parse::<u32>().ok())
        .map(|n| spec.format_id(n))
        .unwrap_or_else(|| id.to_string())
}

/// Supersede `old_id` with a new document titled `new_title` of the same
/// type. The old document gets status `superseded`, a `superseded_by`
/// link, and a dated addendum; the new one records what it supersedes.
pub fn supersede_document(
    project: &Project,
    old_id: DocId,
    new_title: &str,
) -> Result<Supersession, PlanError> {
    let old_path = locator::find_document(project, old_id, true)?;
    let old_content = fs::read_to_string(&old_path)?;
    let (old_mapping, _) = frontmatter::parse(&old_content);
    if let Some(existing) = frontmatter::get_str(&old_mapping, "superseded_by") {
        return Err(PlanError::AlreadySuperseded(format!(
            "{} is already superseded by {}",
            old_id, existing
        )));
    }

    let new_path = super::new::create_document(project, old_id.ty, new_title)?;
    let mut new_content = fs::read_to_string(&new_path)?;
    let new_id = document_id(&new_path, &new_content, old_id);

    if frontmatter::has_frontmatter(&new_content) {
        let mut patch = Mapping::new();
        patch.insert("supersedes".into(), old_id.to_string().into());
        patch.insert("modified".into(), time::today().into());
        new_content = frontmatter::update(&new_content, patch)?;
        fs::write(&new_path, &new_content)?;
    }

    let mut old_content = old_content;
    if frontmatter::has_frontmatter(&old_content) {
        let mut patch = Mapping::new();
        patch.insert("superseded_by".into(), new_id.clone().into());
        patch.insert("status".into(), "superseded".into());
        patch.insert("modified".into(), time::today().into());
        old_content = frontmatter::update(&old_content, patch)?;
    }
    // Status section may be missing in legacy documents; superseding still
    // proceeds on the frontmatter alone.
    old_content = match body::set_status(&old_content, "Superseded") {
        Ok(updated) => updated,
        Err(PlanError::MalformedDocument(_)) => old_content,
        Err(e) => return Err(e),
    };
    let old_content = body::append_addendum(
        &old_content,
        "Superseded",
        &format!("This document has been superseded by {}.", new_id),
    );
    fs::write(&old_path, old_content)?;

    Ok(Supersession { old_path, new_path, new_id })
}
