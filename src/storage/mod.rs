//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with tables:
//! - dbinfo(version), BuilderInfo(guid, fingerprint)
//! - ScanFolders(path, display name, portable key)
//! - Sources(scan folder, name, guid) and SourceDependency(source, depends on, type)
//! - Jobs(source, job key, platform, status) and Products(job, sub id, name)
//! - ProductDependencies(product, target guid + sub id or unresolved path)
//! - LegacySubIDs(product, sub id), Files(scan folder, name, mod time)

pub mod connection;
pub mod schema;
pub mod writer;

pub use connection::AssetDatabase;
pub use writer::DbStats;
