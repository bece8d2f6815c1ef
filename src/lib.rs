//! # Filevault - local file vault
//!
//! Import arbitrary files, keep them in a single-table embedded store,
//! browse and preview them, and export them again.
//!
//! Filevault provides:
//! - A lazily opened, shared store gateway over SQLite
//! - A record codec that decides whether bytes are also exposed as text
//! - Async CRUD operations, each one transaction against the `files` table
//! - Export of single records and tar archives of the whole vault

pub mod record;
pub mod codec;
pub mod storage;
pub mod vault;
pub mod archive;
pub mod import;
pub mod media;
pub mod scratch;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{FileMetadata, FileRecord, NewFileRecord};
pub use codec::{TextClassifier, DEFAULT_MAX_NUL_RATIO};
pub use storage::{SqliteStore, StoreGateway, StoreLocation, VaultStats};
pub use vault::FileVault;

/// Result type alias for Filevault operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Filevault operations
///
/// A missing record is not an error: lookups return `Option`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export error: {0}")]
    Export(String),
}

impl Error {
    /// Whether retrying the same operation can reasonably succeed.
    ///
    /// An unavailable store stays unavailable until `ensure_open` succeeds.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::StoreUnavailable(_))
    }
}
