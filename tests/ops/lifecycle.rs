use plandoc::core::config::Project;
use plandoc::core::error::PlanError;
use plandoc::core::types::{DocId, DocType};
use plandoc::core::{frontmatter, locator};
use plandoc::ops;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn project_at(root: &Path) -> Project {
    let mut project = Project::load(root.to_path_buf());
    ops::init::init_project(&mut project, false).expect("init project");
    project
}

fn run_plandoc(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_plandoc"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run plandoc")
}

#[test]
fn create_assigns_sequential_numbers_per_type() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());

    let first = ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let second = ops::new::create_document(&project, DocType::Adr, "Use Redis").unwrap();
    let other = ops::new::create_document(&project, DocType::Fdp, "Auth flow").unwrap();

    assert!(first.ends_with("001-use-postgres.md"));
    assert!(second.ends_with("002-use-redis.md"));
    // Numbering is independent per type.
    assert!(other.ends_with("FDP-001-auth-flow.md"));

    let content = fs::read_to_string(&first).unwrap();
    let (mapping, _) = frontmatter::parse(&content);
    assert_eq!(frontmatter::get_str(&mapping, "id"), Some("ADR-001"));
    assert_eq!(frontmatter::get_str(&mapping, "status"), Some("proposed"));
}

#[test]
fn archived_numbers_are_never_reused() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());

    ops::new::create_document(&project, DocType::Ap, "First sprint").unwrap();
    let id = DocId::parse("AP-001").unwrap();
    ops::status::update_status(&project, id, "completed").unwrap();
    ops::archive::archive_document(&project, id).unwrap();

    let next = ops::new::create_document(&project, DocType::Ap, "Second sprint").unwrap();
    assert!(next.ends_with("AP-002-second-sprint.md"));
}

#[test]
fn edit_gate_follows_status() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();

    let gate = ops::edit::check_editable(&project, id, false).unwrap();
    assert!(gate.editable);
    assert!(gate.message.is_none());
    assert_eq!(gate.status, "proposed");

    ops::status::update_status(&project, id, "accepted").unwrap();
    let gate = ops::edit::check_editable(&project, id, false).unwrap();
    assert!(!gate.editable);
    assert!(gate.message.unwrap().contains("supersedes"));

    // Force opens the gate but keeps the warning.
    let gate = ops::edit::check_editable(&project, id, true).unwrap();
    assert!(gate.editable);
    assert!(gate.message.unwrap().starts_with("WARNING"));
}

#[test]
fn edit_gate_refuses_archived_documents() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Report, "Q1 retro").unwrap();
    let id = DocId::parse("RPT-001").unwrap();
    ops::archive::archive_document(&project, id).unwrap();

    let gate = ops::edit::check_editable(&project, id, false).unwrap();
    assert!(!gate.editable);
    assert!(gate.message.unwrap().contains("read-only"));
}

#[test]
fn update_status_stamps_frontmatter_and_body() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Fdp, "Auth flow").unwrap();
    let id = DocId::parse("FDP-001").unwrap();

    let update = ops::status::update_status(&project, id, "In Progress").unwrap();
    assert_eq!(update.previous, "proposed");
    assert_eq!(update.status, "in progress");
    assert!(!update.archive_suggested);

    let content = fs::read_to_string(&update.path).unwrap();
    let (mapping, body) = frontmatter::parse(&content);
    assert_eq!(frontmatter::get_str(&mapping, "status"), Some("in progress"));
    assert!(body.contains("## Status\n\nIn Progress\n"));

    // Terminal archive-trigger statuses come back flagged.
    let update = ops::status::update_status(&project, id, "implemented").unwrap();
    assert!(update.archive_suggested);
}

#[test]
fn update_status_rejects_foreign_vocabulary() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();

    let err = ops::status::update_status(&project, id, "implemented").unwrap_err();
    match err {
        PlanError::InvalidStatus(msg) => assert!(msg.contains("accepted")),
        other => panic!("expected InvalidStatus, got {other:?}"),
    }
}

#[test]
fn archive_moves_and_stamps() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();

    let dest = ops::archive::archive_document(&project, id).unwrap();
    assert!(locator::is_archived(&dest));
    assert!(dest.ends_with("archive/001-use-postgres.md"));

    let content = fs::read_to_string(&dest).unwrap();
    let (mapping, body) = frontmatter::parse(&content);
    assert_eq!(frontmatter::get_str(&mapping, "status"), Some("archived"));
    assert!(body.contains("## Status\n\nArchived\n"));
    assert!(body.contains("## Archived\n"));

    // The locator still resolves the id, and re-archiving is refused.
    assert!(locator::find_document(&project, id, true).is_ok());
    let err = ops::archive::archive_document(&project, id).unwrap_err();
    assert!(matches!(err, PlanError::AlreadyArchived(_)));
}

#[test]
fn update_status_refuses_archived_documents() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();
    ops::archive::archive_document(&project, id).unwrap();

    let err = ops::status::update_status(&project, id, "accepted").unwrap_err();
    assert!(matches!(err, PlanError::AlreadyArchived(_)));
}

#[test]
fn append_works_regardless_of_status() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();
    ops::status::update_status(&project, id, "accepted").unwrap();
    ops::archive::archive_document(&project, id).unwrap();

    let path = ops::append::append_to_document(&project, id, "Revisited", "").unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("## Addenda"));
    assert!(content.contains(": Revisited\n\n[Add details here]\n"));

    // A second addendum extends the same section.
    ops::append::append_to_document(&project, id, "Again", "More detail.").unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("## Addenda").count(), 1);
    assert!(content.contains("More detail."));
}

#[test]
fn supersede_links_both_documents() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    let id = DocId::parse("ADR-001").unwrap();

    let result = ops::supersede::supersede_document(&project, id, "Use CockroachDB").unwrap();
    assert_eq!(result.new_id, "ADR-002");
    assert!(result.new_path.ends_with("002-use-cockroachdb.md"));

    let old = fs::read_to_string(&result.old_path).unwrap();
    let (mapping, body) = frontmatter::parse(&old);
    assert_eq!(frontmatter::get_str(&mapping, "status"), Some("superseded"));
    assert_eq!(frontmatter::get_str(&mapping, "superseded_by"), Some("ADR-002"));
    assert!(body.contains("## Status\n\nSuperseded\n"));
    assert!(body.contains("This document has been superseded by ADR-002."));

    let new = fs::read_to_string(&result.new_path).unwrap();
    let (mapping, _) = frontmatter::parse(&new);
    assert_eq!(frontmatter::get_str(&mapping, "supersedes"), Some("ADR-001"));

    let err = ops::supersede::supersede_document(&project, id, "Third try").unwrap_err();
    assert!(matches!(err, PlanError::AlreadySuperseded(_)));
}

#[test]
fn relate_is_deduplicated_and_optionally_bidirectional() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    ops::new::create_document(&project, DocType::Fdp, "Auth flow").unwrap();
    let adr = DocId::parse("ADR-001").unwrap();

    let outcome = ops::relate::relate_documents(
        &project,
        adr,
        &["fdp-001".to_string()],
        true,
    )
    .unwrap();
    assert_eq!(outcome.added, vec!["FDP-001"]);

    let adr_path = locator::find_document(&project, adr, true).unwrap();
    let (mapping, _) = frontmatter::parse(&fs::read_to_string(&adr_path).unwrap());
    let related = mapping.get("related").unwrap().as_sequence().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].as_str(), Some("FDP-001"));

    let fdp_path =
        locator::find_document(&project, DocId::parse("FDP-001").unwrap(), true).unwrap();
    let (mapping, _) = frontmatter::parse(&fs::read_to_string(&fdp_path).unwrap());
    let related = mapping.get("related").unwrap().as_sequence().unwrap();
    assert_eq!(related[0].as_str(), Some("ADR-001"));

    // Repeat is reported, not duplicated.
    let outcome =
        ops::relate::relate_documents(&project, adr, &["FDP-001".to_string()], false).unwrap();
    assert!(outcome.added.is_empty());
    assert_eq!(outcome.already_present, vec!["FDP-001"]);

    let err = ops::relate::relate_documents(&project, adr, &["FDP-099".to_string()], false)
        .unwrap_err();
    assert!(matches!(err, PlanError::NotFound(_)));
}

#[test]
fn relate_reports_frontmatter_less_source_once() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Fdp, "Auth flow").unwrap();
    ops::new::create_document(&project, DocType::Ap, "First sprint").unwrap();

    // A legacy document without frontmatter as the link source.
    let legacy = project.doc_dir(DocType::Adr).join("001-legacy.md");
    fs::write(&legacy, "# ADR-001: Legacy\n\n## Status\n\nProposed\n").unwrap();
    let adr = DocId::parse("ADR-001").unwrap();

    let outcome = ops::relate::relate_documents(
        &project,
        adr,
        &["FDP-001".to_string(), "AP-001".to_string()],
        true,
    )
    .unwrap();

    // One warning for the source, however many targets were named.
    assert_eq!(outcome.skipped, vec!["ADR-001"]);
    assert!(outcome.added.is_empty());
    assert!(outcome.already_present.is_empty());
    assert_eq!(fs::read_to_string(&legacy).unwrap(), "# ADR-001: Legacy\n\n## Status\n\nProposed\n");

    // Reverse links still land on the targets.
    for target in ["FDP-001", "AP-001"] {
        let path = locator::find_document(&project, DocId::parse(target).unwrap(), true).unwrap();
        let (mapping, _) = frontmatter::parse(&fs::read_to_string(&path).unwrap());
        let related = mapping.get("related").unwrap().as_sequence().unwrap();
        assert_eq!(related[0].as_str(), Some("ADR-001"));
    }
}

#[test]
fn list_filters_by_type_status_and_archive() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    ops::new::create_document(&project, DocType::Adr, "Use Postgres").unwrap();
    ops::new::create_document(&project, DocType::Fdp, "Auth flow").unwrap();
    ops::archive::archive_document(&project, DocId::parse("FDP-001").unwrap()).unwrap();

    let entries = ops::list::list_documents(&project, None, None, false).unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["ADR-001"]);

    let entries = ops::list::list_documents(&project, None, None, true).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e.id == "FDP-001" && e.archived));

    let entries =
        ops::list::list_documents(&project, Some(DocType::Fdp), Some("ARCHIVED"), true).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, "archived");

    let table = ops::list::format_table(&entries);
    assert!(table.contains("[A] archived"));
    assert!(table.contains("Auth flow"));
}

#[test]
fn cli_exit_codes_follow_error_class() {
    let tmp = tempdir().expect("tempdir");
    let out = run_plandoc(tmp.path(), &["init"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = run_plandoc(tmp.path(), &["new", "adr", "Use Postgres"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("001-use-postgres.md"));

    // Locator and id-shape failures exit 2.
    let out = run_plandoc(tmp.path(), &["edit", "ADR-099"]);
    assert_eq!(out.status.code(), Some(2));
    let out = run_plandoc(tmp.path(), &["edit", "BOGUS-1"]);
    assert_eq!(out.status.code(), Some(2));

    // A locked edit exits 1; --force turns it into success.
    let out = run_plandoc(tmp.path(), &["update-status", "ADR-001", "accepted"]);
    assert!(out.status.success());
    let out = run_plandoc(tmp.path(), &["edit", "ADR-001"]);
    assert_eq!(out.status.code(), Some(1));
    let out = run_plandoc(tmp.path(), &["edit", "ADR-001", "--force", "--quiet"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("001-use-postgres.md"));
}
