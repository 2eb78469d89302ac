use plandoc::core::assets;
use plandoc::core::config::{Config, Project};
use plandoc::core::locator;
use plandoc::core::types::{DocId, DocType};
use plandoc::core::{body, frontmatter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn project_at(root: &Path) -> Project {
    Project::load(root.to_path_buf())
}

#[test]
fn embedded_templates_resolve_and_substitute() {
    for name in assets::list_templates() {
        let content = assets::get_embedded_template(name).expect("listed template readable");
        assert!(!content.trim().is_empty());
    }

    let adr = assets::get_embedded_template("adr.md").unwrap();
    let rendered = assets::substitute(adr, "004", "Pick a queue", "2026-02-01");
    assert!(rendered.contains("ADR-004"));
    assert!(rendered.contains("Pick a queue"));
    assert!(rendered.contains("2026-02-01"));
    assert!(!rendered.contains("{NUMBER}"));
    assert!(!rendered.contains("{TITLE}"));
}

#[test]
fn project_template_override_beats_embedded() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());

    let templates_dir = project.planning_root().join("templates");
    fs::create_dir_all(&templates_dir).unwrap();
    fs::write(templates_dir.join("adr.md"), "# Custom {TITLE}\n").unwrap();

    let resolved = assets::get_template(&project, "adr.md").unwrap();
    assert_eq!(resolved, "# Custom {TITLE}\n");

    // Other templates still come from the binary.
    let fdp = assets::get_template(&project, "fdp.md").unwrap();
    assert!(fdp.contains("FDP-{NUMBER}"));
}

#[test]
fn rendered_template_parses_as_frontmatter_plus_body() {
    let adr = assets::get_embedded_template("adr.md").unwrap();
    let rendered = assets::substitute(adr, "001", "Use X", "2026-02-01");
    let (mapping, body_text) = frontmatter::parse(&rendered);

    assert_eq!(frontmatter::get_str(&mapping, "type"), Some("adr"));
    assert_eq!(frontmatter::get_str(&mapping, "id"), Some("ADR-001"));
    assert_eq!(frontmatter::get_str(&mapping, "status"), Some("proposed"));
    assert_eq!(frontmatter::get_str(&mapping, "created"), Some("2026-02-01"));

    let outline = body::parse(&body_text);
    assert_eq!(outline.title.as_deref(), Some("Use X"));
    assert_eq!(outline.status.unwrap().value, "Proposed");
    assert!(outline.has_addenda);
}

#[test]
fn locator_finds_active_then_archived() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    let dir = project.doc_dir(DocType::Fdp);
    fs::create_dir_all(dir.join("archive")).unwrap();
    fs::write(dir.join("FDP-001-alpha.md"), "# FDP-001: Alpha\n").unwrap();
    fs::write(dir.join("archive/FDP-002-beta.md"), "# FDP-002: Beta\n").unwrap();

    let id1 = DocId::parse("FDP-001").unwrap();
    let found = locator::find_document(&project, id1, false).unwrap();
    assert!(found.ends_with("FDP-001-alpha.md"));
    assert!(!locator::is_archived(&found));

    let id2 = DocId::parse("FDP-002").unwrap();
    assert!(locator::find_document(&project, id2, false).is_err());
    let found = locator::find_document(&project, id2, true).unwrap();
    assert!(locator::is_archived(&found));

    let missing = DocId::parse("FDP-099").unwrap();
    let err = locator::find_document(&project, missing, true).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn next_number_spans_active_and_archive() {
    let tmp = tempdir().expect("tempdir");
    let project = project_at(tmp.path());
    let dir = project.doc_dir(DocType::Adr);
    fs::create_dir_all(dir.join("archive")).unwrap();

    assert_eq!(locator::next_number(&project, DocType::Adr), 1);

    fs::write(dir.join("001-first.md"), "x").unwrap();
    fs::write(dir.join("archive/003-old.md"), "x").unwrap();
    // Non-matching names are ignored.
    fs::write(dir.join("roadmap.md"), "x").unwrap();

    assert_eq!(locator::next_number(&project, DocType::Adr), 4);
}

#[test]
fn config_round_trip_and_subdir_override() {
    let tmp = tempdir().expect("tempdir");
    let mut config = Config::default();
    config.planning.version = Some("0.2.1".to_string());
    config.planning.root = Some("plans".to_string());
    config
        .planning
        .subdirs
        .insert("adr".to_string(), "adrs".to_string());
    config.save(tmp.path()).unwrap();

    let project = project_at(tmp.path());
    assert_eq!(project.config.version(), "0.2.1");
    assert_eq!(project.planning_root(), tmp.path().join("plans"));
    assert!(project.doc_dir(DocType::Adr).ends_with("plans/adrs"));
    assert!(project.doc_dir(DocType::Fdp).ends_with("plans/designs"));
}

#[test]
fn malformed_config_degrades_to_defaults() {
    let tmp = tempdir().expect("tempdir");
    fs::create_dir_all(tmp.path().join(".plandoc")).unwrap();
    fs::write(tmp.path().join(".plandoc/config.json"), "{not json").unwrap();

    let project = project_at(tmp.path());
    assert_eq!(project.config.version(), "0.1.0");
    assert!(project.planning_root().ends_with("docs/planning"));
}
