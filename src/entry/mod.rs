//! Entry model - typed records for every table of the asset database
//!
//! Each entry type:
//! - starts life unpersisted with an id of `-1`
//! - compares by content, never by id
//! - describes its storage columns once, for both reads and writes
//!
//! Join results (`SourceAndScanFolderEntry`, `CombinedEntry`) are composed
//! from the simple entries rather than redeclaring their fields.

mod columns;
mod kinds;

pub mod builder;
pub mod combined;
pub mod dependency;
pub mod file;
pub mod job;
pub mod product;
pub mod scan_folder;
pub mod source;

pub use builder::{BuilderInfoEntry, DatabaseInfoEntry};
pub use columns::{read_column, Column, ColumnValue, Entry};
pub use combined::{CombinedEntry, SourceAndScanFolderEntry};
pub use dependency::{AssetId, ProductDependencyEntry, SourceFileDependencyEntry};
pub use file::FileEntry;
pub use job::{JobEntry, JobInfo};
pub use kinds::{DependencyFlags, DependencyType, JobStatus, UnresolvedDependencyType};
pub use product::{LegacySubIdEntry, ProductEntry};
pub use scan_folder::ScanFolderEntry;
pub use source::SourceEntry;
