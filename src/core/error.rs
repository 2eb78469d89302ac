use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Config error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid document ID: {0}")]
    InvalidId(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Already archived: {0}")]
    AlreadyArchived(String),
    #[error("Already superseded: {0}")]
    AlreadySuperseded(String),
    #[error("Document is locked: {0}")]
    EditLocked(String),
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PlanError {
    /// Exit code contract: 0 success, 1 user/domain error, 2 for locator
    /// and parse failures where the command distinguishes them.
    pub fn exit_code(&self) -> i32 {
        match self {
            PlanError::NotFound(_) | PlanError::InvalidId(_) | PlanError::MalformedDocument(_) => {
                2
            }
            _ => 1,
        }
    }
}
