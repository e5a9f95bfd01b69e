//! Utility helpers: file writes and backups used by the publish command.
pub mod files;

pub use files::{backup_file, write_with_parents};
