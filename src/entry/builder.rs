use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::columns::column;
use super::{Column, Entry};

/// A registered builder and the fingerprint of its analysis logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderInfoEntry {
    pub builder_info_id: i64,
    pub builder_uuid: Uuid,
    pub analysis_fingerprint: String,
}

impl BuilderInfoEntry {
    pub fn new(builder_uuid: Uuid, analysis_fingerprint: impl Into<String>) -> Self {
        Self {
            builder_info_id: -1,
            builder_uuid,
            analysis_fingerprint: analysis_fingerprint.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.builder_info_id = id;
        self
    }
}

impl Default for BuilderInfoEntry {
    fn default() -> Self {
        Self::new(Uuid::nil(), "")
    }
}

impl PartialEq for BuilderInfoEntry {
    fn eq(&self, other: &Self) -> bool {
        self.builder_uuid == other.builder_uuid
            && self.analysis_fingerprint == other.analysis_fingerprint
    }
}

impl Eq for BuilderInfoEntry {}

impl fmt::Display for BuilderInfoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuilderInfo id:{} uuid:{} fingerprint:{}",
            self.builder_info_id, self.builder_uuid, self.analysis_fingerprint
        )
    }
}

impl Entry for BuilderInfoEntry {
    const TABLE: &'static str = "BuilderInfo";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("BuilderID" => builder_info_id),
        column!("Guid" => builder_uuid),
        column!("AnalysisFingerprint" => analysis_fingerprint),
    ];

    fn id(&self) -> i64 {
        self.builder_info_id
    }

    fn set_id(&mut self, id: i64) {
        self.builder_info_id = id;
    }
}

/// The single `dbinfo` row carrying the schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfoEntry {
    pub row_id: i64,
    pub version: i64,
}

impl Default for DatabaseInfoEntry {
    fn default() -> Self {
        Self { row_id: -1, version: -1 }
    }
}

impl fmt::Display for DatabaseInfoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatabaseInfo version:{}", self.version)
    }
}

impl Entry for DatabaseInfoEntry {
    const TABLE: &'static str = "dbinfo";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("rowID" => row_id),
        column!("version" => version),
    ];

    fn id(&self) -> i64 {
        self.row_id
    }

    fn set_id(&mut self, id: i64) {
        self.row_id = id;
    }
}
