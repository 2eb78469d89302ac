//! Update a document's status in frontmatter and body together.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::DocId;
use crate::core::{body, frontmatter, locator, time};
use serde_yaml::Mapping;
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
pub struct StatusUpdate {
    pub path: PathBuf,
    pub previous: String,
    pub status: String,
    /// The new status is an archive trigger for this type; the caller
    /// should suggest archiving.
    pub archive_suggested: bool,
}

/// Set the status of `id` to `new_status` (validated against the type's
/// vocabulary, case-insensitive). Archived documents are refused.
pub fn update_status(
    project: &Project,
    id: DocId,
    new_status: &str,
) -> Result<StatusUpdate, PlanError> {
    let spec = id.ty.spec();
    let normalized = new_status.trim().to_lowercase();
    if !spec.is_valid_status(&normalized) {
        return Err(PlanError::InvalidStatus(format!(
            "'{}' is not valid for {}. Valid statuses: {}",
            new_status,
            spec.name,
            spec.valid_statuses().join(", ")
        )));
    }

    let path = locator::find_document(project, id, true)?;
    if locator::is_archived(&path) {
        return Err(PlanError::AlreadyArchived(format!(
            "Cannot update archived document: {}",
            path.display()
        )));
    }

    let mut content = fs::read_to_string(&path)?;
    let previous = super::edit::current_status(&content);

    if frontmatter::has_frontmatter(&content) {
        let mut patch = Mapping::new();
        patch.insert("status".into(), normalized.clone().into());
        patch.insert("modified".into(), time::today().into());
        content = frontmatter::update(&content, patch)?;
    }
    let content = body::set_status(&content, &time::title_case(&normalized))?;
    fs::write(&path, content)?;

    Ok(StatusUpdate {
        path,
        previous,
        archive_suggested: spec.is_archive_trigger(&normalized),
        status: normalized,
    })
}
