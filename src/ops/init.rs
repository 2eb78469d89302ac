//! Initialize the planning tree: type directories, roadmap, config stamp.

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::types::DocType;
use crate::core::{assets, migration, time};
use std::fs;
use std::path::PathBuf;

/// Create the planning root with one directory per document type, write
/// the roadmap from its template, and stamp the current schema version
/// into config (first init only). Returns the roadmap path.
pub fn init_project(project: &mut Project, force: bool) -> Result<PathBuf, PlanError> {
    fs::create_dir_all(project.planning_root())?;
    for ty in DocType::all() {
        fs::create_dir_all(project.doc_dir(ty))?;
    }

    let roadmap_path = project.planning_root().join("roadmap.md");
    if roadmap_path.exists() && !force {
        return Err(PlanError::AlreadyExists(format!(
            "{} (use --force to overwrite)",
            roadmap_path.display()
        )));
    }
    let template = assets::get_template(project, "roadmap.md")
        .ok_or_else(|| PlanError::NotFound("No roadmap template".to_string()))?;
    fs::write(&roadmap_path, assets::substitute(&template, "", "", &time::today()))?;

    if project.config.planning.version.is_none() {
        project.config.planning.version = Some(migration::latest_version().to_string());
        project.config.save(&project.root)?;
    }
    Ok(roadmap_path)
}
