//! Core primitives: configuration, the type registry, the frontmatter and
//! body codecs, the document locator, and the migration engine.

pub mod assets;
pub mod body;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod locator;
pub mod migration;
pub mod time;
pub mod types;
