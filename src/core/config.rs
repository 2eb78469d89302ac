//! Project configuration: a JSON file loaded once per invocation.
//!
//! Configuration lives at `<project>/.plandoc/config.json`. It is read a
//! single time into a [`Project`] value which every operation receives as an
//! argument; nothing re-reads the file as ambient state. Only operations
//! that mutate configuration (the migration engine, `init`) write it back.
//!
//! Unknown keys in the file are preserved across load/save so the config
//! can be shared with other tooling.

use crate::core::error::PlanError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Version assumed for projects whose config predates version tracking.
pub const BASELINE_VERSION: &str = "0.1.0";

/// Planning root used when the config carries no override.
pub const DEFAULT_PLANNING_ROOT: &str = "docs/planning";

const CONFIG_DIR: &str = ".plandoc";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub planning: PlanningConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_paths: Option<ProtectedPaths>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Per-type storage directory overrides, keyed by type key (adr, fdp, ...).
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub subdirs: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtectedPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning_root: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Config {
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load from disk. A missing or unparsable file degrades to defaults
    /// rather than failing: every command must work in a bare project.
    pub fn load(project_root: &Path) -> Config {
        let path = Config::path(project_root);
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self, project_root: &Path) -> Result<(), PlanError> {
        let path = Config::path(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(&path, text)?;
        Ok(())
    }

    /// Stored schema version, defaulting to the pre-versioning baseline.
    pub fn version(&self) -> &str {
        self.planning.version.as_deref().unwrap_or(BASELINE_VERSION)
    }

    /// Planning root, resolved in precedence order:
    /// `protected_paths.planning_root`, then `planning.root`, then the
    /// built-in default.
    pub fn planning_root(&self) -> &str {
        if let Some(pp) = &self.protected_paths {
            if let Some(root) = pp.planning_root.as_deref() {
                return root;
            }
        }
        self.planning.root.as_deref().unwrap_or(DEFAULT_PLANNING_ROOT)
    }

    pub fn subdir_override(&self, type_key: &str) -> Option<&str> {
        self.planning.subdirs.get(type_key).map(String::as_str)
    }
}

/// A project directory plus its configuration, loaded once and threaded
/// through every operation.
#[derive(Debug, Clone)]
pub struct Project {
    /// Absolute or caller-relative project root directory.
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub fn load(root: PathBuf) -> Project {
        let config = Config::load(&root);
        Project { root, config }
    }

    pub fn planning_root(&self) -> PathBuf {
        self.root.join(self.config.planning_root())
    }
}
