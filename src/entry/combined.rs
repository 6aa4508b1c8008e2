//! Entries built from joins. Each part keeps its own column projection.

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Entry, JobEntry, LegacySubIdEntry, ProductEntry, ScanFolderEntry, SourceEntry};

/// A source together with the scan folder it lives in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceAndScanFolderEntry {
    pub scan_folder: ScanFolderEntry,
    pub source: SourceEntry,
}

impl SourceAndScanFolderEntry {
    pub fn column_names() -> Vec<&'static str> {
        [ScanFolderEntry::column_names(), SourceEntry::column_names()].concat()
    }

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            scan_folder: ScanFolderEntry::from_row(row)?,
            source: SourceEntry::from_row(row)?,
        })
    }

    /// Scan folder path joined with the source name.
    pub fn full_path(&self) -> String {
        if self.scan_folder.scan_folder.is_empty() {
            return self.source.source_name.clone();
        }
        format!(
            "{}/{}",
            self.scan_folder.scan_folder.trim_end_matches(['/', '\\']),
            self.source.source_name
        )
    }
}

/// The whole ScanFolder -> Source -> Job -> Product chain for one product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedEntry {
    pub scan_folder: ScanFolderEntry,
    pub source: SourceEntry,
    pub job: JobEntry,
    pub product: ProductEntry,
    /// Only filled when the query asked for legacy sub ids.
    pub legacy_sub_ids: Vec<LegacySubIdEntry>,
}

impl CombinedEntry {
    pub fn column_names() -> Vec<&'static str> {
        [
            ScanFolderEntry::column_names(),
            SourceEntry::column_names(),
            JobEntry::column_names(),
            ProductEntry::column_names(),
        ]
        .concat()
    }

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            scan_folder: ScanFolderEntry::from_row(row)?,
            source: SourceEntry::from_row(row)?,
            job: JobEntry::from_row(row)?,
            product: ProductEntry::from_row(row)?,
            legacy_sub_ids: Vec::new(),
        })
    }
}

impl fmt::Display for CombinedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.scan_folder)?;
        writeln!(f, "{}", self.source)?;
        writeln!(f, "{}", self.job)?;
        write!(f, "{}", self.product)?;
        for legacy in &self.legacy_sub_ids {
            write!(f, "\n{}", legacy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_columns_compose_parts() {
        let names = CombinedEntry::column_names();
        assert_eq!(
            names.len(),
            ScanFolderEntry::COLUMNS.len()
                + SourceEntry::COLUMNS.len()
                + JobEntry::COLUMNS.len()
                + ProductEntry::COLUMNS.len()
        );
        assert_eq!(names[0], "ScanFolderID");
        assert!(names.contains(&"JobRunKey"));
        assert!(names.contains(&"LegacyGuid"));
    }

    #[test]
    fn test_full_path() {
        let entry = SourceAndScanFolderEntry {
            scan_folder: ScanFolderEntry::new("c:/game/", "Game", "game", "", true),
            source: SourceEntry::new(1, "textures/a.png", uuid::Uuid::nil(), ""),
        };
        assert_eq!(entry.full_path(), "c:/game/textures/a.png");
    }
}
