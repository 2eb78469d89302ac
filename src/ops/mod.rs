//! Lifecycle operations. Each module composes the registry, locator, and
//! codecs from [`crate::core`] into one user-facing operation.

pub mod append;
pub mod archive;
pub mod edit;
pub mod init;
pub mod list;
pub mod new;
pub mod relate;
pub mod status;
pub mod supersede;
