//! Move a document into its type's `archive/` directory.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::locator::{self, ARCHIVE_DIR};
use crate::core::types::DocId;
use crate::core::{body, frontmatter, time};
use serde_yaml::Mapping;
use std::fs;
use std::path::PathBuf;

/// Archive `id`: stamp status `archived` in frontmatter and body, insert
/// the `## Archived` marker, and move the file under `archive/`. The
/// filename (and so the number) is preserved.
pub fn archive_document(project: &Project, id: DocId) -> Result<PathBuf, PlanError> {
    let path = locator::find_document(project, id, true)?;
    if locator::is_archived(&path) {
        return Err(PlanError::AlreadyArchived(format!(
            "Document is already archived: {}",
            path.display()
        )));
    }

    let mut content = fs::read_to_string(&path)?;
    if frontmatter::has_frontmatter(&content) {
        let mut patch = Mapping::new();
        patch.insert("status".into(), "archived".into());
        patch.insert("modified".into(), time::today().into());
        content = frontmatter::update(&content, patch)?;
    }
    let content = body::set_status(&content, "Archived")?;
    let content = body::insert_archived_marker(&content);

    let archive_dir = path
        .parent()
        .map(|p| p.join(ARCHIVE_DIR))
        .ok_or_else(|| PlanError::NotFound(format!("No parent directory: {}", path.display())))?;
    fs::create_dir_all(&archive_dir)?;
    let filename = path
        .file_name()
        .ok_or_else(|| PlanError::NotFound(format!("No filename: {}", path.display())))?;
    let dest = archive_dir.join(filename);
    if dest.exists() {
        return Err(PlanError::AlreadyExists(format!(
            "Archive destination already exists: {}",
            dest.display()
        )));
    }

    fs::write(&path, content)?;
    fs::rename(&path, &dest)?;
    Ok(dest)
}
