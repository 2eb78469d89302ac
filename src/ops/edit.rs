//! Edit gate: decide whether a document may be edited in place.
//!
//! The gate never opens an editor; it resolves the document, reports
//! whether its current status permits editing, and when it does not,
//! explains which status change would unlock it.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::{DocId, DocType};
use crate::core::{body, frontmatter, locator};
use std::fs;
use std::path::PathBuf;

/// Result of the edit gate for one document.
#[derive(Debug)]
pub struct EditGate {
    pub path: PathBuf,
    pub editable: bool,
    /// Current status as stored (frontmatter first, body fallback).
    pub status: String,
    /// Why the document is locked, or the warning issued when a lock was
    /// overridden with force.
    pub message: Option<String>,
}

/// Current status of a document: frontmatter field first, body `## Status`
/// section second, `"unknown"` when neither is present.
pub fn current_status(content: &str) -> String {
    let (mapping, _) = frontmatter::parse(content);
    if let Some(status) = frontmatter::get_str(&mapping, "status") {
        return status.to_string();
    }
    match body::parse(content).status {
        Some(section) => section.value,
        None => "unknown".to_string(),
    }
}

fn unlock_instruction(ty: DocType, status: &str) -> String {
    let spec = ty.spec();
    match (ty, status) {
        (DocType::Adr, "accepted") => {
            "Accepted decisions are immutable. Record a new decision that supersedes \
             this one, or add an addendum."
                .to_string()
        }
        (DocType::Fdp, "implemented") => {
            "Implemented designs are historical records. Propose a superseding design \
             for further changes."
                .to_string()
        }
        (DocType::Ap, "completed") => {
            "Completed plans are closed. Start a new plan for follow-up work."
                .to_string()
        }
        (DocType::Report, "published") => {
            "Published reports are frozen. Issue a superseding report instead."
                .to_string()
        }
        _ => format!(
            "Documents in status '{}' are locked. Editable statuses for {}: {}",
            status,
            spec.name,
            spec.statuses.editable.join(", ")
        ),
    }
}

/// Run the edit gate for `id`. With `force`, a locked document is reported
/// as editable but carries a warning message.
pub fn check_editable(project: &Project, id: DocId, force: bool) -> Result<EditGate, PlanError> {
    let path = locator::find_document(project, id, true)?;
    let content = fs::read_to_string(&path)?;
    let status = current_status(&content);

    let reason = if locator::is_archived(&path) {
        Some(
            "Archived documents are read-only historical records. \
             Add an addendum to the archived file instead."
                .to_string(),
        )
    } else if id.ty.spec().is_editable(&status) {
        None
    } else {
        Some(unlock_instruction(id.ty, &status.to_lowercase()))
    };

    match reason {
        None => Ok(EditGate { path, editable: true, status, message: None }),
        Some(reason) if force => Ok(EditGate {
            path,
            editable: true,
            status,
            message: Some(format!("WARNING: forcing edit of a locked document. {}", reason)),
        }),
        Some(reason) => Ok(EditGate { path, editable: false, status, message: Some(reason) }),
    }
}
