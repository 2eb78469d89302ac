//! Plandoc: lifecycle manager for structured planning documents.
//!
//! Planning documents (decision records, design proposals, action plans,
//! reports) live as markdown files with YAML frontmatter under a per-project
//! planning root. This crate provides the full lifecycle: creation with
//! auto-numbering, a status-driven edit gate, append-only addenda,
//! archival, supersession chains, cross-linking, and versioned schema
//! migrations.
//!
//! # Layout
//!
//! - [`core`]: configuration, the document type registry, frontmatter and
//!   body codecs, the locator, and the migration engine.
//! - [`ops`]: one module per user-facing operation, composed from `core`.
//!
//! The binary is a thin wrapper over [`run`], which parses the CLI and
//! dispatches to `ops`.

pub mod core;
pub mod ops;

use crate::core::config::Project;
use crate::core::error::PlanError;
use crate::core::migration;
use crate::core::types::{DocId, DocType};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "plandoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage the lifecycle of structured planning documents"
)]
struct Cli {
    /// Project directory (defaults to the current working directory).
    #[clap(long, global = true, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize the planning tree and roadmap
    Init {
        /// Overwrite an existing roadmap
        #[clap(long)]
        force: bool,
    },
    /// Create a new planning document with the next number
    New {
        /// Document type: adr, fdp, ap, or report
        #[clap(value_name = "TYPE")]
        doc_type: String,
        /// Document title
        title: String,
    },
    /// Check whether a document may be edited and print its path
    Edit {
        /// Document id, e.g. ADR-001
        doc_id: String,
        /// Proceed even when the document is locked
        #[clap(long, short = 'f')]
        force: bool,
        /// Print only the path, suppress gate diagnostics
        #[clap(long, short = 'q')]
        quiet: bool,
    },
    /// Append a dated addendum (allowed regardless of status)
    Append {
        doc_id: String,
        /// Addendum title
        title: String,
        /// Addendum text
        #[clap(long, default_value = "")]
        body: String,
    },
    /// Update a document's status
    UpdateStatus {
        doc_id: String,
        /// New status from the type's vocabulary
        status: String,
    },
    /// Move a document into archival storage
    Archive { doc_id: String },
    /// Create a replacement document and cross-link both
    Supersede {
        doc_id: String,
        /// Title of the superseding document
        new_title: String,
    },
    /// Record related-document links
    Relate {
        doc_id: String,
        /// Ids to link, e.g. FDP-002 AP-003
        #[clap(required = true)]
        related_ids: Vec<String>,
        /// Also record the reverse link on each target
        #[clap(long, short = 'b')]
        bidirectional: bool,
    },
    /// List planning documents
    List {
        /// Filter by type: adr, fdp, ap, or report
        #[clap(long, short = 't', value_name = "TYPE")]
        doc_type: Option<String>,
        /// Filter by status (case-insensitive)
        #[clap(long, short = 's')]
        status: Option<String>,
        /// Include archived documents
        #[clap(long, short = 'a')]
        include_archived: bool,
    },
    /// Schema version and migrations
    Migrate(MigrateCli),
}

#[derive(Args, Debug)]
struct MigrateCli {
    #[clap(subcommand)]
    command: MigrateCommand,
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Show the project's schema version against the latest
    Status,
    /// Apply pending migrations
    Upgrade {
        /// Show what would change without writing anything
        #[clap(long, short = 'n')]
        dry_run: bool,
        /// Target version (defaults to the latest)
        #[clap(long, value_name = "VERSION")]
        to: Option<String>,
    },
    /// Show the migration changelog, optionally for one version
    Changelog { version: Option<String> },
}

fn parse_doc_type(raw: &str) -> Result<DocType, PlanError> {
    DocType::from_key(&raw.to_lowercase()).ok_or_else(|| {
        PlanError::ValidationError(format!(
            "Unknown document type '{}'. Expected one of: adr, fdp, ap, report",
            raw
        ))
    })
}

/// Parse the CLI and run one command against the project.
pub fn run() -> Result<(), PlanError> {
    let cli = Cli::parse();
    let root = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let mut project = Project::load(root);

    match cli.command {
        Command::Init { force } => {
            let roadmap = ops::init::init_project(&mut project, force)?;
            println!("{} {}", "Initialized:".bright_green(), project.planning_root().display());
            println!("Roadmap: {}", roadmap.display());
            Ok(())
        }
        Command::New { doc_type, title } => {
            let ty = parse_doc_type(&doc_type)?;
            let path = ops::new::create_document(&project, ty, &title)?;
            println!("{} {}", "Created:".bright_green(), path.display());
            Ok(())
        }
        Command::Edit { doc_id, force, quiet } => {
            let id = DocId::parse(&doc_id)?;
            let gate = ops::edit::check_editable(&project, id, force)?;
            if gate.editable {
                if let Some(warning) = &gate.message {
                    if !quiet {
                        eprintln!("{} {}", "warning:".bright_yellow(), warning);
                    }
                }
                println!("{}", gate.path.display());
                Ok(())
            } else {
                if !quiet {
                    eprintln!("Status: {}", gate.status);
                    eprintln!(
                        "Tip: 'plandoc append {} \"<title>\"' records an addendum without editing.",
                        id
                    );
                }
                let reason = gate.message.unwrap_or_else(|| "document is locked".to_string());
                Err(PlanError::EditLocked(format!("{}: {}", id, reason)))
            }
        }
        Command::Append { doc_id, title, body } => {
            let id = DocId::parse(&doc_id)?;
            let path = ops::append::append_to_document(&project, id, &title, &body)?;
            println!("{} addendum to {}", "Added".bright_green(), path.display());
            Ok(())
        }
        Command::UpdateStatus { doc_id, status } => {
            let id = DocId::parse(&doc_id)?;
            let update = ops::status::update_status(&project, id, &status)?;
            println!("{} {}", "Updated:".bright_green(), update.path.display());
            println!("Status: {} -> {}", update.previous, update.status);
            if update.archive_suggested {
                println!(
                    "{} status '{}' usually ends a document's life; consider \
                     'plandoc archive {}'",
                    "Note:".bright_yellow(),
                    update.status,
                    id
                );
            }
            Ok(())
        }
        Command::Archive { doc_id } => {
            let id = DocId::parse(&doc_id)?;
            let dest = ops::archive::archive_document(&project, id)?;
            println!("{} {}", "Archived:".bright_green(), dest.display());
            Ok(())
        }
        Command::Supersede { doc_id, new_title } => {
            let id = DocId::parse(&doc_id)?;
            let result = ops::supersede::supersede_document(&project, id, &new_title)?;
            println!("{} {}", "Created:".bright_green(), result.new_path.display());
            println!("{} marked superseded by {}", id, result.new_id);
            Ok(())
        }
        Command::Relate { doc_id, related_ids, bidirectional } => {
            let id = DocId::parse(&doc_id)?;
            let outcome = ops::relate::relate_documents(&project, id, &related_ids, bidirectional)?;
            for added in &outcome.added {
                println!("{} {} <-> {}", "Linked:".bright_green(), id, added);
            }
            for present in &outcome.already_present {
                println!("Already linked: {}", present);
            }
            for skipped in &outcome.skipped {
                eprintln!(
                    "{} {} has no frontmatter, link not recorded",
                    "warning:".bright_yellow(),
                    skipped
                );
            }
            Ok(())
        }
        Command::List { doc_type, status, include_archived } => {
            let ty = doc_type.as_deref().map(parse_doc_type).transpose()?;
            let entries =
                ops::list::list_documents(&project, ty, status.as_deref(), include_archived)?;
            print!("{}", ops::list::format_table(&entries));
            Ok(())
        }
        Command::Migrate(migrate) => match migrate.command {
            MigrateCommand::Status => {
                migration::print_status(&project);
                Ok(())
            }
            MigrateCommand::Upgrade { dry_run, to } => {
                migration::upgrade(&mut project, to.as_deref(), dry_run)
            }
            MigrateCommand::Changelog { version } => migration::print_changelog(version.as_deref()),
        },
    }
}
