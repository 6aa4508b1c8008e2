use serde::{Deserialize, Serialize};
use std::fmt;

use super::columns::column;
use super::{Column, Entry};

/// Any file or folder seen under a scan folder, recognised as a source or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_id: i64,
    pub scan_folder_pk: i64,
    pub file_name: String,
    pub is_folder: bool,
    pub mod_time: u64,
}

impl FileEntry {
    pub fn new(scan_folder_pk: i64, file_name: impl Into<String>, is_folder: bool, mod_time: u64) -> Self {
        Self {
            file_id: -1,
            scan_folder_pk,
            file_name: file_name.into(),
            is_folder,
            mod_time,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.file_id = id;
        self
    }
}

impl Default for FileEntry {
    fn default() -> Self {
        Self::new(-1, "", false, 0)
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        self.scan_folder_pk == other.scan_folder_pk
            && self.file_name == other.file_name
            && self.is_folder == other.is_folder
            && self.mod_time == other.mod_time
    }
}

impl Eq for FileEntry {}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File id:{} scanfolder:{} name:{} folder:{} modtime:{}",
            self.file_id, self.scan_folder_pk, self.file_name, self.is_folder, self.mod_time
        )
    }
}

impl Entry for FileEntry {
    const TABLE: &'static str = "Files";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("FileID" => file_id),
        column!("ScanFolderPK" => scan_folder_pk),
        column!("FileName" => file_name),
        column!("IsFolder" => is_folder),
        column!("ModTime" => mod_time),
    ];

    fn id(&self) -> i64 {
        self.file_id
    }

    fn set_id(&mut self, id: i64) {
        self.file_id = id;
    }
}
