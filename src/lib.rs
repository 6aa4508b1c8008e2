//! # assetdb - Asset Dependency Database
//!
//! Persistent store behind an incremental, multi-platform asset pipeline.
//!
//! assetdb provides:
//! - Typed entries for scan folders, sources, jobs, products and their dependency edges
//! - SQLite-backed storage with schema version and table validation on open
//! - A catalog of named, parameterized queries that stream entries to a handler
//! - Direct and transitive product dependency traversal
//! - Late binding of dependencies that were recorded by path

pub mod entry;
pub mod storage;
pub mod query;
pub mod dependency;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use entry::{
    AssetId, CombinedEntry, DependencyType, Entry, FileEntry, JobEntry, JobInfo, JobStatus,
    ProductDependencyEntry, ProductEntry, ScanFolderEntry, SourceEntry,
};
pub use query::{JobFilter, LikeType};
pub use storage::AssetDatabase;

/// Result type alias for asset database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for asset database operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Permission denied: {0} is read-only")]
    PermissionDenied(std::path::PathBuf),

    #[error("Incompatible schema: database is version {found}, expected {expected}")]
    IncompatibleSchema { found: i64, expected: i64 },

    #[error("Corrupt schema: table {0} is missing")]
    CorruptSchema(String),

    #[error("Query {query} failed: {source}")]
    QueryExecution {
        query: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query {query} expects {expected} parameters, got {actual}")]
    AttributeMismatch {
        query: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Database is not open")]
    NotOpen,

    #[error("Database is open read-only")]
    ReadOnly,

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
