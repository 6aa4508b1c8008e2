//! Query Layer - typed, streaming lookups over the asset database
//!
//! Every lookup is an `AssetDatabase` method that binds its arguments into a
//! named catalog statement and pushes each decoded entry to a handler. The
//! handler returns `false` to stop early; finding nothing is not an error.

pub mod catalog;
pub mod filter;
pub mod like;

mod combined;
mod dependencies;
mod files;
mod jobs;
mod products;
mod scan_folders;
mod sources;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::{ParamKind, SqlParam, SqlQuery, SqlValue};
pub use filter::JobFilter;
pub use like::LikeType;
