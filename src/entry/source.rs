use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::columns::column;
use super::{Column, Entry};

/// A source file inside a scan folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    pub source_id: i64,
    pub scan_folder_pk: i64,
    pub source_name: String,
    pub source_guid: Uuid,
    pub analysis_fingerprint: String,
}

impl SourceEntry {
    pub fn new(
        scan_folder_pk: i64,
        source_name: impl Into<String>,
        source_guid: Uuid,
        analysis_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            source_id: -1,
            scan_folder_pk,
            source_name: source_name.into(),
            source_guid,
            analysis_fingerprint: analysis_fingerprint.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.source_id = id;
        self
    }
}

impl Default for SourceEntry {
    fn default() -> Self {
        Self::new(-1, "", Uuid::nil(), "")
    }
}

impl PartialEq for SourceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.scan_folder_pk == other.scan_folder_pk
            && self.source_name == other.source_name
            && self.source_guid == other.source_guid
            && self.analysis_fingerprint == other.analysis_fingerprint
    }
}

impl Eq for SourceEntry {}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source id:{} scanfolder:{} name:{} guid:{} fingerprint:{}",
            self.source_id,
            self.scan_folder_pk,
            self.source_name,
            self.source_guid,
            self.analysis_fingerprint
        )
    }
}

impl Entry for SourceEntry {
    const TABLE: &'static str = "Sources";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("SourceID" => source_id),
        column!("ScanFolderPK" => scan_folder_pk),
        column!("SourceName" => source_name),
        column!("SourceGuid" => source_guid),
        column!("AnalysisFingerprint" => analysis_fingerprint),
    ];

    fn id(&self) -> i64 {
        self.source_id
    }

    fn set_id(&mut self, id: i64) {
        self.source_id = id;
    }
}
