//! Document type registry and per-type status model.
//!
//! One static entry per document type (compiled into the binary), with the
//! storage directory overridable from project configuration. Everything
//! else — id/filename formats, template, status vocabulary — is fixed per
//! release.

use crate::core::config::{Config, Project};
use crate::core::error::PlanError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The closed set of planning document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    Adr,
    Fdp,
    Ap,
    Report,
}

impl DocType {
    pub fn all() -> [DocType; 4] {
        [DocType::Adr, DocType::Fdp, DocType::Ap, DocType::Report]
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    pub fn from_key(key: &str) -> Option<DocType> {
        DocType::all().into_iter().find(|t| t.key() == key)
    }

    pub fn spec(self) -> &'static TypeSpec {
        match self {
            DocType::Adr => &TYPE_ADR,
            DocType::Fdp => &TYPE_FDP,
            DocType::Ap => &TYPE_AP,
            DocType::Report => &TYPE_REPORT,
        }
    }
}

/// Per-type status model: a flat vocabulary, not a transition graph.
/// Any member may follow any other; `initial` is assigned only at creation.
#[derive(Debug, Clone, Serialize)]
pub struct StatusModel {
    pub initial: &'static str,
    pub editable: &'static [&'static str],
    pub terminal: &'static [&'static str],
    pub archive_triggers: &'static [&'static str],
}

/// Static registry entry describing one document type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSpec {
    pub key: &'static str,
    pub name: &'static str,
    /// Default storage directory under the planning root.
    pub default_dir: &'static str,
    /// Literal filename prefix (empty for ADRs: `001-slug.md`).
    pub file_prefix: &'static str,
    /// Prefix used in display ids (`ADR-001`).
    pub id_prefix: &'static str,
    /// Embedded template name.
    pub template: &'static str,
    pub statuses: StatusModel,
}

static TYPE_ADR: TypeSpec = TypeSpec {
    key: "adr",
    name: "Architecture Decision Record",
    default_dir: "decisions",
    file_prefix: "",
    id_prefix: "ADR",
    template: "adr.md",
    statuses: StatusModel {
        initial: "proposed",
        editable: &["proposed"],
        terminal: &["accepted"],
        archive_triggers: &["deprecated", "superseded"],
    },
};

static TYPE_FDP: TypeSpec = TypeSpec {
    key: "fdp",
    name: "Feature Design Proposal",
    default_dir: "designs",
    file_prefix: "FDP-",
    id_prefix: "FDP",
    template: "fdp.md",
    statuses: StatusModel {
        initial: "proposed",
        editable: &["proposed", "in progress"],
        terminal: &["implemented"],
        archive_triggers: &["implemented", "abandoned"],
    },
};

static TYPE_AP: TypeSpec = TypeSpec {
    key: "ap",
    name: "Action Plan",
    default_dir: "action-plans",
    file_prefix: "AP-",
    id_prefix: "AP",
    template: "action-plan.md",
    statuses: StatusModel {
        initial: "active",
        editable: &["active"],
        terminal: &["completed"],
        archive_triggers: &["completed", "abandoned"],
    },
};

static TYPE_REPORT: TypeSpec = TypeSpec {
    key: "report",
    name: "Report",
    default_dir: "reports",
    file_prefix: "RPT-",
    id_prefix: "RPT",
    template: "report.md",
    statuses: StatusModel {
        initial: "draft",
        editable: &["draft"],
        terminal: &["published"],
        archive_triggers: &["superseded", "obsoleted"],
    },
};

impl TypeSpec {
    /// Storage directory for this type, honoring the config override.
    pub fn dir<'a>(&'a self, config: &'a Config) -> &'a str {
        config.subdir_override(self.key).unwrap_or(self.default_dir)
    }

    /// Display id like `ADR-001`.
    pub fn format_id(&self, number: u32) -> String {
        format!("{}-{:03}", self.id_prefix, number)
    }

    /// Filename like `001-slug.md` or `FDP-001-slug.md`.
    pub fn format_filename(&self, number: u32, slug: &str) -> String {
        format!("{}{:03}-{}.md", self.file_prefix, number, slug)
    }

    /// Regex matching this type's filenames, capturing the number.
    pub fn filename_pattern(&self) -> Regex {
        Regex::new(&format!(r"^{}(\d+)-.*\.md$", regex::escape(self.file_prefix)))
            .expect("static filename pattern")
    }

    /// Sorted union of the status sets, lower-cased.
    pub fn valid_statuses(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = std::iter::once(self.statuses.initial)
            .chain(self.statuses.editable.iter().copied())
            .chain(self.statuses.terminal.iter().copied())
            .chain(self.statuses.archive_triggers.iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn is_valid_status(&self, status: &str) -> bool {
        let status = status.to_lowercase();
        self.valid_statuses().iter().any(|s| *s == status)
    }

    pub fn is_editable(&self, status: &str) -> bool {
        let status = status.to_lowercase();
        self.statuses.editable.iter().any(|s| *s == status)
    }

    pub fn is_archive_trigger(&self, status: &str) -> bool {
        let status = status.to_lowercase();
        self.statuses.archive_triggers.iter().any(|s| *s == status)
    }
}

impl Project {
    /// Active storage directory for a document type.
    pub fn doc_dir(&self, ty: DocType) -> PathBuf {
        self.planning_root().join(ty.spec().dir(&self.config))
    }
}

/// A parsed document identity: type plus per-type number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocId {
    pub ty: DocType,
    pub number: u32,
}

impl DocId {
    /// Parse a display id like `ADR-001` (case-insensitive).
    pub fn parse(raw: &str) -> Result<DocId, PlanError> {
        let upper = raw.trim().to_uppercase();
        for ty in DocType::all() {
            let spec = ty.spec();
            if let Some(rest) = upper.strip_prefix(spec.id_prefix) {
                if let Some(digits) = rest.strip_prefix('-') {
                    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                        let number: u32 = digits.parse().map_err(|_| {
                            PlanError::InvalidId(format!("{}: number out of range", raw))
                        })?;
                        return Ok(DocId { ty, number });
                    }
                }
            }
        }
        Err(PlanError::InvalidId(format!(
            "{}. Expected format: ADR-001, FDP-002, AP-003, or RPT-001",
            raw
        )))
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty.spec().format_id(self.number))
    }
}
