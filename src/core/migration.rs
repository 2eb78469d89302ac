//! Versioned schema migrations for planning documents and configuration.
//!
//! Migrations are a static registry compiled into the binary, ordered by
//! version. Each entry may carry a script implementing [`MigrationScript`];
//! entries without one are metadata-only version bumps. `upgrade` applies
//! every entry between the project's stored version and the target, aborts
//! on the first failure, and persists the new version into config only on
//! full success. Scripts are idempotent: a file that already carries
//! frontmatter is skipped, so re-running after a partial failure is safe.

use crate::core::body;
use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::frontmatter::{self, ADDENDA_SEPARATOR};
use crate::core::time;
use crate::core::types::{DocId, DocType};
use colored::Colorize;
use serde_yaml::{Mapping, Value};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one migration script run.
#[derive(Debug, Default)]
pub struct MigrationOutcome {
    pub migrated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// A migration script: enumerate intended changes without mutating
/// anything, or apply them.
pub trait MigrationScript: Sync {
    fn dry_run(&self, project: &Project) -> Result<Vec<String>, PlanError>;
    fn migrate(&self, project: &Project) -> Result<MigrationOutcome, PlanError>;
}

/// Registry entry for one schema version.
pub struct MigrationSpec {
    pub version: &'static str,
    pub date: &'static str,
    pub description: &'static str,
    pub breaking: bool,
    pub script: Option<&'static dyn MigrationScript>,
}

static MIGRATIONS: [MigrationSpec; 2] = [
    MigrationSpec {
        version: "0.2.0",
        date: "2025-11-02",
        description: "Introduce per-type planning configuration (planning.subdirs)",
        breaking: false,
        script: None,
    },
    MigrationSpec {
        version: "0.2.1",
        date: "2025-11-18",
        description: "Add YAML frontmatter to all planning documents",
        breaking: true,
        script: Some(&AddFrontmatter),
    },
];

/// All migrations, ascending by version.
pub fn all_migrations() -> &'static [MigrationSpec] {
    &MIGRATIONS
}

/// Newest schema version the registry knows about.
pub fn latest_version() -> &'static str {
    MIGRATIONS
        .last()
        .map(|m| m.version)
        .unwrap_or(crate::core::config::BASELINE_VERSION)
}

fn parse_version(v: &str) -> (u32, u32, u32) {
    let mut parts = v.split('.').map(|p| p.trim().parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// Numeric version comparison; `0.10.0` sorts after `0.2.1`.
pub fn cmp_versions(a: &str, b: &str) -> Ordering {
    parse_version(a).cmp(&parse_version(b))
}

/// Registry entries with `current < version <= target`, ascending.
pub fn pending<'a>(current: &str, target: &str) -> Vec<&'a MigrationSpec> {
    MIGRATIONS
        .iter()
        .filter(|m| {
            cmp_versions(m.version, current) == Ordering::Greater
                && cmp_versions(m.version, target) != Ordering::Greater
        })
        .collect()
}

/// Print the project's schema version against the registry's newest.
pub fn print_status(project: &Project) {
    let current = project.config.version().to_string();
    let latest = latest_version();

    println!("Project: {}", project.root.display());
    println!("Current version: {}", current);
    println!("Latest version:  {}", latest);

    if cmp_versions(&current, latest) == Ordering::Less {
        println!();
        println!(
            "{} run {} to upgrade to {}",
            "Upgrade available:".bright_yellow(),
            "plandoc migrate upgrade".bright_cyan(),
            latest
        );
        println!();
        println!("Versions to apply:");
        for spec in pending(&current, latest) {
            let breaking = if spec.breaking { " (BREAKING)" } else { "" };
            println!("  {}: {}{}", spec.version, spec.description, breaking);
        }
    } else {
        println!();
        println!("{}", "Up to date.".bright_green());
    }
}

/// Print the registry changelog; with a version, just that entry.
pub fn print_changelog(version: Option<&str>) -> Result<(), PlanError> {
    match version {
        Some(v) => {
            let spec = MIGRATIONS
                .iter()
                .find(|m| m.version == v)
                .ok_or_else(|| PlanError::NotFound(format!("No such version: {}", v)))?;
            let breaking = if spec.breaking { " [BREAKING]" } else { "" };
            println!("{} ({}){}", spec.version, spec.date, breaking);
            println!("  {}", spec.description);
        }
        None => {
            println!("Available versions:\n");
            for spec in &MIGRATIONS {
                let breaking = if spec.breaking { " [BREAKING]" } else { "" };
                println!("  {} ({}){}", spec.version, spec.date, breaking);
                println!("    {}", spec.description);
                println!();
            }
        }
    }
    Ok(())
}

/// Apply every migration between the stored version and `to` (default:
/// latest). Aborts on the first failing script without applying later
/// entries; persists the target version into config on full success.
/// With `dry_run`, enumerates the identical change set and writes nothing.
pub fn upgrade(project: &mut Project, to: Option<&str>, dry_run: bool) -> Result<(), PlanError> {
    apply_registry(project, &MIGRATIONS, to, dry_run)
}

fn apply_registry(
    project: &mut Project,
    registry: &[MigrationSpec],
    to: Option<&str>,
    dry_run: bool,
) -> Result<(), PlanError> {
    let current = project.config.version().to_string();
    let target = match to {
        Some(v) => v.to_string(),
        None => registry
            .last()
            .map(|m| m.version)
            .unwrap_or(crate::core::config::BASELINE_VERSION)
            .to_string(),
    };

    if cmp_versions(&current, &target) != Ordering::Less {
        println!("Already at version {}, no upgrade needed.", current);
        return Ok(());
    }

    let selected: Vec<&MigrationSpec> = registry
        .iter()
        .filter(|m| {
            cmp_versions(m.version, &current) == Ordering::Greater
                && cmp_versions(m.version, &target) != Ordering::Greater
        })
        .collect();
    if selected.is_empty() {
        println!("No migrations to apply.");
        return Ok(());
    }

    if dry_run {
        println!("Dry run - showing what would change:\n");
        for spec in selected {
            println!("=== Version {} ===", spec.version);
            match spec.script {
                Some(script) => {
                    let changes = script.dry_run(project)?;
                    if changes.is_empty() {
                        println!("  No changes needed");
                    }
                    for change in changes {
                        println!("  - {}", change);
                    }
                }
                None => println!("  No migration script (metadata only)"),
            }
            println!();
        }
        return Ok(());
    }

    println!("Upgrading from {} to {}...\n", current, target);

    for spec in selected {
        println!("=== Applying {} ===", spec.version);
        if let Some(script) = spec.script {
            let outcome = script.migrate(project)?;
            println!(
                "  {} migrated, {} skipped",
                outcome.migrated, outcome.skipped
            );
            if !outcome.errors.is_empty() {
                for err in &outcome.errors {
                    eprintln!("  {} {}", "error:".bright_red(), err);
                }
                return Err(PlanError::MigrationFailed(format!(
                    "migration {} reported {} error(s)",
                    spec.version,
                    outcome.errors.len()
                )));
            }
        } else {
            println!("  No migration needed (metadata update only)");
        }
        println!();
    }

    project.config.planning.version = Some(target.clone());
    project.config.save(&project.root)?;

    println!(
        "{} upgraded to {}",
        "Successfully".bright_green(),
        target.bright_white().bold()
    );
    Ok(())
}

// --- v0.2.1: frontmatter backfill ---

/// Adds synthesized frontmatter to every legacy planning document.
struct AddFrontmatter;

/// One classified legacy document awaiting backfill.
struct Candidate {
    path: PathBuf,
    id: DocId,
}

enum Classified {
    Ready(Candidate),
    AlreadyCurrent(PathBuf),
    Unknown(PathBuf),
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            // Project-local template overrides are not documents.
            if path.file_name().is_some_and(|n| n == "templates") {
                continue;
            }
            collect_markdown(&path, out);
        } else if path.extension().is_some_and(|e| e == "md") {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name == "template.md" || name == "roadmap.md" {
                continue;
            }
            out.push(path);
        }
    }
}

fn find_planning_docs(planning_root: &Path) -> Vec<PathBuf> {
    let mut docs = Vec::new();
    collect_markdown(planning_root, &mut docs);
    docs.sort();
    docs
}

/// Directory names used by earlier layouts, mapped to types.
fn type_for_dir_name(project: &Project, dir_name: &str) -> Option<DocType> {
    for ty in DocType::all() {
        if ty.spec().dir(&project.config) == dir_name {
            return Some(ty);
        }
    }
    match dir_name {
        "decision-records" | "decisions" => Some(DocType::Adr),
        "feature-designs" | "designs" => Some(DocType::Fdp),
        "action-plans" => Some(DocType::Ap),
        "reports" => Some(DocType::Report),
        _ => None,
    }
}

fn infer_doc_type(project: &Project, path: &Path, planning_root: &Path) -> Option<DocType> {
    let rel = path.strip_prefix(planning_root).ok()?;
    let mut components = rel.components().filter_map(|c| c.as_os_str().to_str());
    if let Some(first) = components.next() {
        let dir_name = if first == "archive" {
            components.next().unwrap_or("")
        } else {
            first
        };
        if let Some(ty) = type_for_dir_name(project, dir_name) {
            return Some(ty);
        }
    }

    let name = path.file_name()?.to_str()?;
    for ty in [DocType::Fdp, DocType::Ap, DocType::Report] {
        if name.starts_with(ty.spec().file_prefix) {
            return Some(ty);
        }
    }
    if name.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return Some(DocType::Adr);
    }
    None
}

fn classify(project: &Project, path: &Path, planning_root: &Path) -> Classified {
    let Ok(content) = fs::read_to_string(path) else {
        return Classified::Unknown(path.to_path_buf());
    };
    if content.starts_with("---\n") {
        return Classified::AlreadyCurrent(path.to_path_buf());
    }
    let Some(ty) = infer_doc_type(project, path, planning_root) else {
        return Classified::Unknown(path.to_path_buf());
    };
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let Some(caps) = ty.spec().filename_pattern().captures(name) else {
        return Classified::Unknown(path.to_path_buf());
    };
    let Ok(number) = caps[1].parse::<u32>() else {
        return Classified::Unknown(path.to_path_buf());
    };
    Classified::Ready(Candidate {
        path: path.to_path_buf(),
        id: DocId { ty, number },
    })
}

fn legacy_mapping(id: DocId, status: &str, created: &str) -> Mapping {
    let mut mapping = Mapping::new();
    mapping.insert("type".into(), id.ty.key().into());
    mapping.insert("id".into(), id.to_string().into());
    mapping.insert("status".into(), status.into());
    mapping.insert("created".into(), created.into());
    mapping.insert("modified".into(), time::today().into());
    mapping.insert("supersedes".into(), Value::Null);
    mapping.insert("superseded_by".into(), Value::Null);
    mapping.insert("obsoleted_by".into(), Value::Null);
    mapping.insert("related".into(), Value::Sequence(Vec::new()));
    mapping
}

fn backfill_document(candidate: &Candidate) -> Result<(), PlanError> {
    let mut content = fs::read_to_string(&candidate.path)?;
    let outline = body::parse(&content);

    let status = outline
        .status
        .map(|s| s.value.to_lowercase())
        .unwrap_or_else(|| candidate.id.ty.spec().statuses.initial.to_string());
    let created = outline.date.unwrap_or_else(time::today);

    if !outline.has_addenda {
        content = format!("{}{}", content.trim_end(), ADDENDA_SEPARATOR);
    }

    let header = frontmatter::render(&legacy_mapping(candidate.id, &status, &created))?;
    fs::write(&candidate.path, format!("{}\n{}", header, content))?;
    Ok(())
}

impl MigrationScript for AddFrontmatter {
    fn dry_run(&self, project: &Project) -> Result<Vec<String>, PlanError> {
        let mut changes = Vec::new();
        if cmp_versions(project.config.version(), "0.2.1") == Ordering::Less {
            changes.push("Update config: planning.version -> 0.2.1".to_string());
        }
        let planning_root = project.planning_root();
        for path in find_planning_docs(&planning_root) {
            match classify(project, &path, &planning_root) {
                Classified::Ready(c) => {
                    let name = c.path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    changes.push(format!("Add frontmatter: {} ({})", c.id, name));
                }
                Classified::AlreadyCurrent(_) => {}
                Classified::Unknown(path) => {
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    changes.push(format!("Skip (unknown type): {}", name));
                }
            }
        }
        Ok(changes)
    }

    fn migrate(&self, project: &Project) -> Result<MigrationOutcome, PlanError> {
        let planning_root = project.planning_root();
        println!("Migrating planning documents in: {}", planning_root.display());

        let mut outcome = MigrationOutcome::default();
        for path in find_planning_docs(&planning_root) {
            match classify(project, &path, &planning_root) {
                Classified::Ready(candidate) => match backfill_document(&candidate) {
                    Ok(()) => {
                        println!("  Migrated: {}", candidate.id);
                        outcome.migrated += 1;
                    }
                    Err(e) => {
                        outcome
                            .errors
                            .push(format!("{}: {}", candidate.path.display(), e));
                    }
                },
                Classified::AlreadyCurrent(path) => {
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    println!("  Skipped: {} (already has frontmatter)", name);
                    outcome.skipped += 1;
                }
                Classified::Unknown(path) => {
                    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    println!("  Skipped: {} (could not determine type)", name);
                    outcome.skipped += 1;
                }
            }
        }
        Ok(outcome)
    }
}
