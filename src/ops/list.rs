//! List planning documents as a fixed-width table.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::locator::ARCHIVE_DIR;
use crate::core::types::DocType;
use crate::core::{body, frontmatter};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct DocEntry {
    pub id: String,
    pub type_label: &'static str,
    pub title: String,
    pub status: String,
    pub path: PathBuf,
    pub archived: bool,
}

fn entry_for(path: &Path, ty: DocType, number: u32, archived: bool) -> Option<DocEntry> {
    let content = fs::read_to_string(path).ok()?;
    let (mapping, _) = frontmatter::parse(&content);
    let outline = body::parse(&content);

    let status = frontmatter::get_str(&mapping, "status")
        .map(str::to_string)
        .or_else(|| outline.status.as_ref().map(|s| s.value.to_lowercase()))
        .unwrap_or_else(|| "unknown".to_string());
    let title = outline.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    Some(DocEntry {
        id: ty.spec().format_id(number),
        type_label: ty.spec().id_prefix,
        title,
        status,
        path: path.to_path_buf(),
        archived,
    })
}

fn collect_dir(dir: &Path, ty: DocType, archived: bool, out: &mut Vec<DocEntry>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let pattern = ty.spec().filename_pattern();
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = pattern.captures(name) else {
            continue;
        };
        let Ok(number) = caps[1].parse::<u32>() else {
            continue;
        };
        if let Some(entry) = entry_for(&path, ty, number, archived) {
            out.push(entry);
        }
    }
}

/// Collect documents, optionally filtered by type and status
/// (case-insensitive), in id order per type.
pub fn list_documents(
    project: &Project,
    ty: Option<DocType>,
    status: Option<&str>,
    include_archived: bool,
) -> Result<Vec<DocEntry>, PlanError> {
    let types = match ty {
        Some(t) => vec![t],
        None => DocType::all().to_vec(),
    };

    let mut entries = Vec::new();
    for t in types {
        let dir = project.doc_dir(t);
        collect_dir(&dir, t, false, &mut entries);
        if include_archived {
            collect_dir(&dir.join(ARCHIVE_DIR), t, true, &mut entries);
        }
    }

    if let Some(wanted) = status {
        let wanted = wanted.to_lowercase();
        entries.retain(|e| e.status.to_lowercase() == wanted);
    }
    Ok(entries)
}

/// Render entries as an aligned table. Archived rows carry an `[A]` marker.
pub fn format_table(entries: &[DocEntry]) -> String {
    if entries.is_empty() {
        return "No documents found.\n".to_string();
    }

    let mut out = String::new();
    let id_w = entries.iter().map(|e| e.id.len()).max().unwrap_or(2).max(2);
    let status_w = entries
        .iter()
        .map(|e| e.status.len() + if e.archived { 4 } else { 0 })
        .max()
        .unwrap_or(6)
        .max(6);

    out.push_str(&format!("{:<id_w$}  {:<4}  {:<status_w$}  Title\n", "ID", "Type", "Status"));
    out.push_str(&format!("{}  {}  {}  {}\n", "-".repeat(id_w), "----", "-".repeat(status_w), "-----"));
    for e in entries {
        let status = if e.archived {
            format!("[A] {}", e.status)
        } else {
            e.status.clone()
        };
        let mut title = e.title.clone();
        if title.chars().count() > 50 {
            title = title.chars().take(47).collect::<String>() + "...";
        }
        out.push_str(&format!(
            "{:<id_w$}  {:<4}  {:<status_w$}  {}\n",
            e.id, e.type_label, status, title
        ));
    }
    out
}
