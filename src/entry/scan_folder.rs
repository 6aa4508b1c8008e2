use serde::{Deserialize, Serialize};
use std::fmt;

use super::columns::column;
use super::{Column, Entry};

/// A root directory that sources are tracked under.
///
/// Two scan folders are the same folder when their portable keys match, no
/// matter where the folder lives on this machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFolderEntry {
    pub scan_folder_id: i64,
    pub scan_folder: String,
    pub display_name: String,
    pub portable_key: String,
    pub output_prefix: String,
    pub is_root: bool,
}

impl ScanFolderEntry {
    pub fn new(
        scan_folder: impl Into<String>,
        display_name: impl Into<String>,
        portable_key: impl Into<String>,
        output_prefix: impl Into<String>,
        is_root: bool,
    ) -> Self {
        Self {
            scan_folder_id: -1,
            scan_folder: scan_folder.into(),
            display_name: display_name.into(),
            portable_key: portable_key.into(),
            output_prefix: output_prefix.into(),
            is_root,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.scan_folder_id = id;
        self
    }
}

impl Default for ScanFolderEntry {
    fn default() -> Self {
        Self::new("", "", "", "", false)
    }
}

impl PartialEq for ScanFolderEntry {
    fn eq(&self, other: &Self) -> bool {
        self.portable_key == other.portable_key
    }
}

impl Eq for ScanFolderEntry {}

impl fmt::Display for ScanFolderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanFolder id:{} path:{} key:{} display:{} prefix:{} root:{}",
            self.scan_folder_id,
            self.scan_folder,
            self.portable_key,
            self.display_name,
            self.output_prefix,
            self.is_root
        )
    }
}

impl Entry for ScanFolderEntry {
    const TABLE: &'static str = "ScanFolders";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("ScanFolderID" => scan_folder_id),
        column!("ScanFolder" => scan_folder),
        column!("DisplayName" => display_name),
        column!("PortableKey" => portable_key),
        column!("OutputPrefix" => output_prefix),
        column!("IsRoot" => is_root),
    ];

    fn id(&self) -> i64 {
        self.scan_folder_id
    }

    fn set_id(&mut self, id: i64) {
        self.scan_folder_id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_portable_key_only() {
        let a = ScanFolderEntry::new("c:/dev/game", "Game", "game", "", true).with_id(3);
        let b = ScanFolderEntry::new("/home/me/game", "My Game", "game", "out", false);
        let c = ScanFolderEntry::new("c:/dev/game", "Game", "engine", "", true);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_columns_start_with_primary_key() {
        assert_eq!(ScanFolderEntry::primary_key(), "ScanFolderID");
        assert_eq!(ScanFolderEntry::column_names().len(), 6);
        let entry = ScanFolderEntry::new("root", "Root", "root", "", true);
        assert_eq!(entry.values().len(), 5);
    }
}
