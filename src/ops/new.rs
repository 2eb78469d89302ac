//! Create a new planning document with the next available number.

use crate::core::assets;
use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::locator;
use crate::core::time;
use crate::core::types::DocType;
use std::fs;
use std::path::PathBuf;

/// Turn a title into a filename slug: lowercase, alphanumerics kept,
/// whitespace runs collapsed to single hyphens, everything else dropped.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            out.push(c);
            pending_hyphen = false;
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
        // Everything else (punctuation, non-ascii) is dropped.
    }
    out
}

/// Create a document of `ty` titled `title` in its active directory.
///
/// The number is one past the highest in use (active or archived), the
/// body comes from the type's template, and the frontmatter starts in the
/// type's initial status.
pub fn create_document(project: &Project, ty: DocType, title: &str) -> Result<PathBuf, PlanError> {
    let spec = ty.spec();
    let dir = project.doc_dir(ty);
    fs::create_dir_all(&dir)?;

    let number = locator::next_number(project, ty);
    let slug = slugify(title);
    if slug.is_empty() {
        return Err(PlanError::ValidationError(format!(
            "Title '{}' produces an empty filename slug",
            title
        )));
    }
    let path = dir.join(spec.format_filename(number, &slug));
    if path.exists() {
        return Err(PlanError::AlreadyExists(path.display().to_string()));
    }

    let template = assets::get_template(project, spec.template).ok_or_else(|| {
        PlanError::NotFound(format!("No template for document type '{}'", spec.key))
    })?;
    let content = assets::substitute(&template, &format!("{:03}", number), title, &time::today());
    fs::write(&path, content)?;
    Ok(path)
}
