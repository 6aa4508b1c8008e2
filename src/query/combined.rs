//! Combined ScanFolder -> Source -> Job -> Product queries.
//!
//! Job criteria are checked per row instead of being bound into yet more
//! statement variants. Legacy sub ids are attached on request with one extra
//! lookup per product.

use uuid::Uuid;

use super::catalog::{self, SqlQuery, SqlValue};
use super::filter::JobFilter;
use super::like::LikeType;
use crate::entry::{CombinedEntry, Entry, LegacySubIdEntry};
use crate::storage::AssetDatabase;
use crate::Result;

impl AssetDatabase {
    pub fn query_combined(
        &self,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED,
            &catalog::COMBINED_PLATFORM,
            &[],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_by_source_id(
        &self,
        source_id: i64,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_SOURCE_ID,
            &catalog::COMBINED_BY_SOURCE_ID_PLATFORM,
            &[SqlValue::Integer(source_id)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_by_job_id(
        &self,
        job_id: i64,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_JOB_ID,
            &catalog::COMBINED_BY_JOB_ID_PLATFORM,
            &[SqlValue::Integer(job_id)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_by_product_id(
        &self,
        product_id: i64,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_PRODUCT_ID,
            &catalog::COMBINED_BY_PRODUCT_ID_PLATFORM,
            &[SqlValue::Integer(product_id)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    /// Products with this sub id whose source GUID, or legacy GUID, is `source_guid`.
    pub fn query_combined_by_source_guid_sub_id(
        &self,
        source_guid: Uuid,
        sub_id: u32,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_SOURCE_GUID_SUB_ID,
            &catalog::COMBINED_BY_SOURCE_GUID_SUB_ID_PLATFORM,
            &[SqlValue::Integer(i64::from(sub_id)), SqlValue::Guid(source_guid)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_by_source_name(
        &self,
        source_name: &str,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_SOURCE_NAME,
            &catalog::COMBINED_BY_SOURCE_NAME_PLATFORM,
            &[SqlValue::Text(source_name)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_like_source_name(
        &self,
        source_name: &str,
        like: LikeType,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(source_name);
        self.visit_combined(
            &catalog::COMBINED_LIKE_SOURCE_NAME,
            &catalog::COMBINED_LIKE_SOURCE_NAME_PLATFORM,
            &[SqlValue::Text(&pattern)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_by_product_name(
        &self,
        product_name: &str,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        self.visit_combined(
            &catalog::COMBINED_BY_PRODUCT_NAME,
            &catalog::COMBINED_BY_PRODUCT_NAME_PLATFORM,
            &[SqlValue::Text(product_name)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    pub fn query_combined_like_product_name(
        &self,
        product_name: &str,
        like: LikeType,
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(product_name);
        self.visit_combined(
            &catalog::COMBINED_LIKE_PRODUCT_NAME,
            &catalog::COMBINED_LIKE_PRODUCT_NAME_PLATFORM,
            &[SqlValue::Text(&pattern)],
            filter,
            include_legacy_sub_ids,
            handler,
        )
    }

    fn visit_combined(
        &self,
        query: &'static SqlQuery,
        platform_query: &'static SqlQuery,
        args: &[SqlValue<'_>],
        filter: &JobFilter,
        include_legacy_sub_ids: bool,
        mut handler: impl FnMut(CombinedEntry) -> bool,
    ) -> Result<()> {
        // An error from the legacy lookup stops the outer walk and is reported after it.
        let mut nested = Ok(());
        let visit = |mut entry: CombinedEntry| {
            if !filter.matches(&entry.job) {
                return true;
            }
            if include_legacy_sub_ids {
                match self.collect(
                    &catalog::LEGACY_SUB_IDS_BY_PRODUCT_ID,
                    &[SqlValue::Integer(entry.product.product_id)],
                    LegacySubIdEntry::from_row,
                ) {
                    Ok(legacy) => entry.legacy_sub_ids = legacy,
                    Err(e) => {
                        nested = Err(e);
                        return false;
                    }
                }
            }
            handler(entry)
        };

        match filter.platform_filter() {
            Some(platform) => {
                let mut bound = args.to_vec();
                bound.push(SqlValue::Text(platform));
                self.run(platform_query, &bound, CombinedEntry::from_row, visit)?;
            }
            None => self.run(query, args, CombinedEntry::from_row, visit)?,
        }
        nested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JobStatus;
    use crate::query::fixtures::Fixture;

    fn product_names(
        f: impl FnOnce(&mut dyn FnMut(CombinedEntry) -> bool) -> Result<()>,
    ) -> Vec<String> {
        let mut names = Vec::new();
        f(&mut |entry: CombinedEntry| {
            names.push(entry.product.product_name);
            true
        })
        .unwrap();
        names.sort();
        names
    }

    #[test]
    fn test_job_key_and_status_filter() {
        let fx = Fixture::new();

        let completed = JobFilter::new().job_key("Compile").status(JobStatus::Completed);
        assert_eq!(
            product_names(|h| fx.db.query_combined(&completed, false, h)),
            vec![
                "pc/docs/100%_done.txt",
                "pc/meshes/tree.mat",
                "pc/meshes/tree.mesh",
                "pc/textures/rock.dds",
            ]
        );

        let any_status = JobFilter::new().job_key("Compile").status(JobStatus::Any);
        assert_eq!(product_names(|h| fx.db.query_combined(&any_status, false, h)).len(), 5);

        let mut rows = Vec::new();
        fx.db
            .query_combined(&completed, false, |entry| {
                rows.push(entry);
                true
            })
            .unwrap();
        assert!(rows
            .iter()
            .all(|e| e.job.job_key == "Compile" && e.job.status == JobStatus::Completed));
    }

    #[test]
    fn test_combined_chain_is_complete() {
        let fx = Fixture::new();
        let mut rows = Vec::new();
        fx.db
            .query_combined_by_product_id(fx.done_txt.product_id, &JobFilter::default(), false, |entry| {
                rows.push(entry);
                true
            })
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.scan_folder, fx.gems);
        assert_eq!(row.source, fx.done);
        assert_eq!(row.job, fx.done_pc);
        assert_eq!(row.product, fx.done_txt);
        assert!(row.legacy_sub_ids.is_empty());
    }

    #[test]
    fn test_legacy_sub_ids_attached_on_request() {
        let fx = Fixture::new();
        let mut rows = Vec::new();
        fx.db
            .query_combined_by_job_id(fx.tree_compile.job_id, &JobFilter::default(), true, |entry| {
                rows.push(entry);
                true
            })
            .unwrap();

        let mesh = rows
            .iter()
            .find(|e| e.product == fx.tree_mesh)
            .unwrap();
        assert_eq!(mesh.legacy_sub_ids.len(), 1);
        assert_eq!(mesh.legacy_sub_ids[0].sub_id, 1000);

        let mat = rows.iter().find(|e| e.product == fx.tree_mat).unwrap();
        assert!(mat.legacy_sub_ids.is_empty());
    }

    #[test]
    fn test_lookup_by_legacy_guid() {
        let fx = Fixture::new();

        let by_source = product_names(|h| {
            fx.db.query_combined_by_source_guid_sub_id(fx.rock.source_guid, 0, &JobFilter::new().platform("pc"), false, h)
        });
        assert_eq!(by_source, vec!["pc/textures/rock.dds"]);

        let by_legacy = product_names(|h| {
            fx.db.query_combined_by_source_guid_sub_id(fx.tree_mat.legacy_guid, 1, &JobFilter::default(), false, h)
        });
        assert_eq!(by_legacy, vec!["pc/meshes/tree.mat"]);
    }

    #[test]
    fn test_name_and_pattern_lookups() {
        let fx = Fixture::new();
        let any = JobFilter::default();

        assert_eq!(
            product_names(|h| fx.db.query_combined_by_source_name("meshes/tree.fbx", &JobFilter::new().job_key("Copy"), false, h)),
            vec!["pc/meshes/tree.fbx"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_combined_like_source_name("100%", LikeType::Matches, &any, false, h)),
            vec!["pc/docs/100%_done.txt"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_combined_by_product_name("android/textures/rock.astc", &any, false, h)),
            vec!["android/textures/rock.astc"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_combined_like_product_name("pc/meshes/", LikeType::StartsWith, &JobFilter::new().platform("pc"), false, h)),
            vec!["pc/meshes/tree.fbx", "pc/meshes/tree.mat", "pc/meshes/tree.mesh"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_combined_by_source_id(fx.rock.source_id, &JobFilter::new().platform("ios"), false, h)),
            Vec::<String>::new()
        );
    }
}
