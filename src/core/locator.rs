//! Document locator: resolve a type+number to exactly one file.
//!
//! Documents are found by scanning the type's active directory for a
//! filename matching the type's prefix+number pattern, then the `archive/`
//! child. When two files spuriously carry the same number, the first match
//! in directory-iteration order wins; the iteration order itself is left
//! to the filesystem.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::{DocId, DocType};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name holding archived documents under each type directory.
pub const ARCHIVE_DIR: &str = "archive";

fn match_number(dir: &Path, pattern: &regex::Regex, number: u32) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(caps) = pattern.captures(name) {
            if caps[1].parse::<u32>().ok() == Some(number) {
                return Some(path);
            }
        }
    }
    None
}

/// Find the file backing `id`, searching the active directory and, when
/// `include_archive` is set, its `archive/` child.
pub fn find_document(
    project: &Project,
    id: DocId,
    include_archive: bool,
) -> Result<PathBuf, PlanError> {
    let dir = project.doc_dir(id.ty);
    let pattern = id.ty.spec().filename_pattern();

    if let Some(path) = match_number(&dir, &pattern, id.number) {
        return Ok(path);
    }
    if include_archive {
        if let Some(path) = match_number(&dir.join(ARCHIVE_DIR), &pattern, id.number) {
            return Ok(path);
        }
    }
    Err(PlanError::NotFound(format!("Document not found: {}", id)))
}

/// True when the path sits under an `archive/` directory.
pub fn is_archived(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == ARCHIVE_DIR)
}

fn max_number_in(dir: &Path, pattern: &regex::Regex) -> u32 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let mut max = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if let Some(caps) = pattern.captures(name) {
                if let Ok(num) = caps[1].parse::<u32>() {
                    max = max.max(num);
                }
            }
        }
    }
    max
}

/// Next number for a type: one past the highest number present in either
/// the active or archive directory. Archiving or deleting a file never
/// frees its number.
pub fn next_number(project: &Project, ty: DocType) -> u32 {
    let dir = project.doc_dir(ty);
    let pattern = ty.spec().filename_pattern();
    let active = max_number_in(&dir, &pattern);
    let archived = max_number_in(&dir.join(ARCHIVE_DIR), &pattern);
    active.max(archived) + 1
}
