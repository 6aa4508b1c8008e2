//! File bookkeeping lookups.

use super::catalog::{self, SqlValue};
use super::like::LikeType;
use crate::entry::{Entry, FileEntry};
use crate::storage::AssetDatabase;
use crate::Result;

impl AssetDatabase {
    pub fn query_files_table(&self, handler: impl FnMut(FileEntry) -> bool) -> Result<()> {
        self.run(&catalog::FILES_TABLE, &[], FileEntry::from_row, handler)
    }

    pub fn query_file_by_id(&self, file_id: i64, handler: impl FnMut(FileEntry) -> bool) -> Result<()> {
        self.run(&catalog::FILE_BY_ID, &[SqlValue::Integer(file_id)], FileEntry::from_row, handler)
    }

    pub fn query_files_by_scan_folder_id(
        &self,
        scan_folder_id: i64,
        handler: impl FnMut(FileEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::FILES_BY_SCAN_FOLDER_ID,
            &[SqlValue::Integer(scan_folder_id)],
            FileEntry::from_row,
            handler,
        )
    }

    pub fn query_file_by_name_scan_folder_id(
        &self,
        file_name: &str,
        scan_folder_id: i64,
        handler: impl FnMut(FileEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::FILE_BY_NAME_SCAN_FOLDER_ID,
            &[SqlValue::Integer(scan_folder_id), SqlValue::Text(file_name)],
            FileEntry::from_row,
            handler,
        )
    }

    pub fn query_files_like_name(
        &self,
        file_name: &str,
        like: LikeType,
        handler: impl FnMut(FileEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(file_name);
        self.run(&catalog::FILES_LIKE_NAME, &[SqlValue::Text(&pattern)], FileEntry::from_row, handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::Fixture;

    #[test]
    fn test_file_lookups() {
        let fx = Fixture::new();
        let mut texture = FileEntry::new(fx.assets.scan_folder_id, "textures/rock.png", false, 1_700_000_000);
        let mut folder = FileEntry::new(fx.assets.scan_folder_id, "textures", true, 1_700_000_000);
        let mut readme = FileEntry::new(fx.gems.scan_folder_id, "README_1.md", false, u64::MAX);
        for file in [&mut texture, &mut folder, &mut readme] {
            fx.db.set_entry(file).unwrap();
        }

        let mut in_assets = Vec::new();
        fx.db
            .query_files_by_scan_folder_id(fx.assets.scan_folder_id, |f| {
                in_assets.push(f);
                true
            })
            .unwrap();
        assert_eq!(in_assets.len(), 2);

        let mut by_name = Vec::new();
        fx.db
            .query_file_by_name_scan_folder_id("README_1.md", fx.gems.scan_folder_id, |f| {
                by_name.push(f);
                true
            })
            .unwrap();
        assert_eq!(by_name, vec![readme.clone()]);
        assert_eq!(by_name[0].mod_time, u64::MAX);

        let mut like = Vec::new();
        fx.db
            .query_files_like_name("_", LikeType::Matches, |f| {
                like.push(f.file_name);
                true
            })
            .unwrap();
        assert_eq!(like, vec!["README_1.md"]);

        let mut by_id = None;
        fx.db
            .query_file_by_id(folder.file_id, |f| {
                by_id = Some(f);
                false
            })
            .unwrap();
        assert!(by_id.unwrap().is_folder);

        let mut total = 0;
        fx.db
            .query_files_table(|_| {
                total += 1;
                true
            })
            .unwrap();
        assert_eq!(total, 3);
    }
}
