//! Scan folder, builder and schema info lookups.

use super::catalog::{self, SqlValue};
use crate::entry::{BuilderInfoEntry, DatabaseInfoEntry, Entry, ScanFolderEntry};
use crate::storage::AssetDatabase;
use crate::Result;

impl AssetDatabase {
    pub fn query_database_info_table(&self, handler: impl FnMut(DatabaseInfoEntry) -> bool) -> Result<()> {
        self.run(&catalog::DATABASE_INFO_TABLE, &[], DatabaseInfoEntry::from_row, handler)
    }

    pub fn query_builder_info_table(&self, handler: impl FnMut(BuilderInfoEntry) -> bool) -> Result<()> {
        self.run(&catalog::BUILDER_INFO_TABLE, &[], BuilderInfoEntry::from_row, handler)
    }

    pub fn query_scan_folders_table(&self, handler: impl FnMut(ScanFolderEntry) -> bool) -> Result<()> {
        self.run(&catalog::SCAN_FOLDERS_TABLE, &[], ScanFolderEntry::from_row, handler)
    }

    pub fn query_scan_folder_by_id(
        &self,
        scan_folder_id: i64,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_ID,
            &[SqlValue::Integer(scan_folder_id)],
            ScanFolderEntry::from_row,
            handler,
        )
    }

    pub fn query_scan_folder_by_display_name(
        &self,
        display_name: &str,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_DISPLAY_NAME,
            &[SqlValue::Text(display_name)],
            ScanFolderEntry::from_row,
            handler,
        )
    }

    pub fn query_scan_folder_by_portable_key(
        &self,
        portable_key: &str,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_PORTABLE_KEY,
            &[SqlValue::Text(portable_key)],
            ScanFolderEntry::from_row,
            handler,
        )
    }

    /// Scan folder that holds the given source.
    pub fn query_scan_folder_by_source_id(
        &self,
        source_id: i64,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_SOURCE_ID,
            &[SqlValue::Integer(source_id)],
            ScanFolderEntry::from_row,
            handler,
        )
    }

    pub fn query_scan_folder_by_job_id(
        &self,
        job_id: i64,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_JOB_ID,
            &[SqlValue::Integer(job_id)],
            ScanFolderEntry::from_row,
            handler,
        )
    }

    pub fn query_scan_folder_by_product_id(
        &self,
        product_id: i64,
        handler: impl FnMut(ScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SCAN_FOLDER_BY_PRODUCT_ID,
            &[SqlValue::Integer(product_id)],
            ScanFolderEntry::from_row,
            handler,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::entry::{BuilderInfoEntry, ScanFolderEntry};
    use crate::query::fixtures::Fixture;
    use crate::storage::schema;
    use uuid::Uuid;

    #[test]
    fn test_database_info_holds_current_version() {
        let fx = Fixture::new();
        let mut versions = Vec::new();
        fx.db
            .query_database_info_table(|info| {
                versions.push(info.version);
                true
            })
            .unwrap();
        assert_eq!(versions, vec![schema::CURRENT_VERSION]);
    }

    #[test]
    fn test_builder_info_roundtrip() {
        let fx = Fixture::new();
        let mut builder = BuilderInfoEntry::new(Uuid::new_v4(), "analysis-v3");
        fx.db.set_entry(&mut builder).unwrap();

        let mut found = Vec::new();
        fx.db
            .query_builder_info_table(|b| {
                found.push(b);
                true
            })
            .unwrap();
        assert_eq!(found, vec![builder]);
    }

    #[test]
    fn test_lookup_by_unique_keys() {
        let fx = Fixture::new();

        let mut by_key = None;
        fx.db
            .query_scan_folder_by_portable_key("gems", |f| {
                by_key = Some(f);
                false
            })
            .unwrap();
        assert_eq!(by_key.unwrap().scan_folder_id, fx.gems.scan_folder_id);

        let mut by_name = None;
        fx.db
            .query_scan_folder_by_display_name("Assets", |f| {
                by_name = Some(f);
                false
            })
            .unwrap();
        assert_eq!(by_name.unwrap(), fx.assets);

        let mut calls = 0;
        fx.db
            .query_scan_folder_by_portable_key("missing", |_| {
                calls += 1;
                true
            })
            .unwrap();
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_lookup_from_owned_rows() {
        let fx = Fixture::new();
        let mut found: Vec<ScanFolderEntry> = Vec::new();

        fx.db
            .query_scan_folder_by_source_id(fx.done.source_id, |f| {
                found.push(f);
                true
            })
            .unwrap();
        fx.db
            .query_scan_folder_by_job_id(fx.rock_pc.job_id, |f| {
                found.push(f);
                true
            })
            .unwrap();
        fx.db
            .query_scan_folder_by_product_id(fx.tree_mat.product_id, |f| {
                found.push(f);
                true
            })
            .unwrap();

        assert_eq!(found, vec![fx.gems.clone(), fx.assets.clone(), fx.assets.clone()]);
    }
}
