//! Product lookups.
//!
//! Product statements select `Products.*, Jobs.*` so that the job criteria
//! of a [`JobFilter`] can be checked against the same row.

use super::catalog::{self, SqlQuery, SqlValue};
use super::filter::JobFilter;
use super::like::LikeType;
use crate::entry::{AssetId, Entry, JobEntry, LegacySubIdEntry, ProductEntry};
use crate::storage::AssetDatabase;
use crate::Result;

fn product_and_job(row: &rusqlite::Row<'_>) -> rusqlite::Result<(ProductEntry, JobEntry)> {
    Ok((ProductEntry::from_row(row)?, JobEntry::from_row(row)?))
}

impl AssetDatabase {
    pub fn query_products_table(&self, filter: &JobFilter, handler: impl FnMut(ProductEntry) -> bool) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCTS_TABLE,
            Some(&catalog::PRODUCTS_TABLE_PLATFORM),
            &[],
            filter,
            handler,
        )
    }

    pub fn query_product_by_id(&self, product_id: i64, handler: impl FnMut(ProductEntry) -> bool) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_ID,
            None,
            &[SqlValue::Integer(product_id)],
            &JobFilter::default(),
            handler,
        )
    }

    pub fn query_products_by_job_id(
        &self,
        job_id: i64,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_JOB_ID,
            Some(&catalog::PRODUCT_BY_JOB_ID_PLATFORM),
            &[SqlValue::Integer(job_id)],
            filter,
            handler,
        )
    }

    pub fn query_products_by_source_id(
        &self,
        source_id: i64,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_SOURCE_ID,
            Some(&catalog::PRODUCT_BY_SOURCE_ID_PLATFORM),
            &[SqlValue::Integer(source_id)],
            filter,
            handler,
        )
    }

    /// Products addressed by logical identity.
    pub fn query_products_by_asset_id(
        &self,
        asset_id: AssetId,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_SOURCE_GUID_SUB_ID,
            None,
            &[SqlValue::Guid(asset_id.source_guid), SqlValue::Integer(i64::from(asset_id.sub_id))],
            &JobFilter::default(),
            handler,
        )
    }

    pub fn query_product_by_job_id_sub_id(
        &self,
        job_id: i64,
        sub_id: u32,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_JOB_ID_SUB_ID,
            None,
            &[SqlValue::Integer(job_id), SqlValue::Integer(i64::from(sub_id))],
            &JobFilter::default(),
            handler,
        )
    }

    pub fn query_products_by_name(
        &self,
        product_name: &str,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_NAME,
            Some(&catalog::PRODUCT_BY_NAME_PLATFORM),
            &[SqlValue::Text(product_name)],
            filter,
            handler,
        )
    }

    pub fn query_products_like_name(
        &self,
        product_name: &str,
        like: LikeType,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(product_name);
        self.visit_products(
            &catalog::PRODUCT_LIKE_NAME,
            Some(&catalog::PRODUCT_LIKE_NAME_PLATFORM),
            &[SqlValue::Text(&pattern)],
            filter,
            handler,
        )
    }

    pub fn query_products_by_source_name(
        &self,
        source_name: &str,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        self.visit_products(
            &catalog::PRODUCT_BY_SOURCE_NAME,
            Some(&catalog::PRODUCT_BY_SOURCE_NAME_PLATFORM),
            &[SqlValue::Text(source_name)],
            filter,
            handler,
        )
    }

    pub fn query_products_like_source_name(
        &self,
        source_name: &str,
        like: LikeType,
        filter: &JobFilter,
        handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(source_name);
        self.visit_products(
            &catalog::PRODUCT_LIKE_SOURCE_NAME,
            Some(&catalog::PRODUCT_LIKE_SOURCE_NAME_PLATFORM),
            &[SqlValue::Text(&pattern)],
            filter,
            handler,
        )
    }

    pub fn query_legacy_sub_ids_by_product_id(
        &self,
        product_id: i64,
        handler: impl FnMut(LegacySubIdEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::LEGACY_SUB_IDS_BY_PRODUCT_ID,
            &[SqlValue::Integer(product_id)],
            LegacySubIdEntry::from_row,
            handler,
        )
    }

    /// Run `query`, or its platform variant with the platform appended when
    /// the filter names one, and hand over products whose job passes `filter`.
    fn visit_products(
        &self,
        query: &'static SqlQuery,
        platform_query: Option<&'static SqlQuery>,
        args: &[SqlValue<'_>],
        filter: &JobFilter,
        mut handler: impl FnMut(ProductEntry) -> bool,
    ) -> Result<()> {
        let visit = |(product, job): (ProductEntry, JobEntry)| {
            if filter.matches(&job) { handler(product) } else { true }
        };
        match (filter.platform_filter(), platform_query) {
            (Some(platform), Some(platform_query)) => {
                let mut bound = args.to_vec();
                bound.push(SqlValue::Text(platform));
                self.run(platform_query, &bound, product_and_job, visit)
            }
            _ => self.run(query, args, product_and_job, visit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JobStatus;
    use crate::query::fixtures::Fixture;

    fn product_names(f: impl FnOnce(&mut dyn FnMut(ProductEntry) -> bool) -> Result<()>) -> Vec<String> {
        let mut names = Vec::new();
        f(&mut |p: ProductEntry| {
            names.push(p.product_name);
            true
        })
        .unwrap();
        names.sort();
        names
    }

    #[test]
    fn test_products_table_with_platform_and_status() {
        let fx = Fixture::new();

        assert_eq!(product_names(|h| fx.db.query_products_table(&JobFilter::default(), h)).len(), 6);
        assert_eq!(
            product_names(|h| fx.db.query_products_table(&JobFilter::new().platform("android"), h)),
            vec!["android/textures/rock.astc"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_table(&JobFilter::new().job_key("Copy").status(JobStatus::Queued), h)),
            vec!["pc/meshes/tree.fbx"]
        );
    }

    #[test]
    fn test_products_by_owner() {
        let fx = Fixture::new();

        assert_eq!(
            product_names(|h| fx.db.query_products_by_job_id(fx.tree_compile.job_id, &JobFilter::default(), h)),
            vec!["pc/meshes/tree.mat", "pc/meshes/tree.mesh"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_by_source_id(fx.tree.source_id, &JobFilter::new().job_key("Compile"), h)),
            vec!["pc/meshes/tree.mat", "pc/meshes/tree.mesh"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_by_asset_id(AssetId::new(fx.tree.source_guid, 1), h)),
            vec!["pc/meshes/tree.mat"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_product_by_job_id_sub_id(fx.tree_compile.job_id, 0, h)),
            vec!["pc/meshes/tree.mesh"]
        );
    }

    #[test]
    fn test_products_by_name() {
        let fx = Fixture::new();

        let mut found = Vec::new();
        fx.db
            .query_product_by_id(fx.rock_dds.product_id, |p| {
                found.push(p);
                true
            })
            .unwrap();
        assert_eq!(found, vec![fx.rock_dds.clone()]);

        assert_eq!(
            product_names(|h| fx.db.query_products_by_name("pc/textures/rock.dds", &JobFilter::new().platform("android"), h)),
            Vec::<String>::new()
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_like_name("rock", LikeType::Matches, &JobFilter::default(), h)),
            vec!["android/textures/rock.astc", "pc/textures/rock.dds"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_like_name("%", LikeType::Matches, &JobFilter::default(), h)),
            vec!["pc/docs/100%_done.txt"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_by_source_name("textures/rock.png", &JobFilter::new().platform("pc"), h)),
            vec!["pc/textures/rock.dds"]
        );
        assert_eq!(
            product_names(|h| fx.db.query_products_like_source_name(".fbx", LikeType::EndsWith, &JobFilter::default(), h)),
            vec!["pc/meshes/tree.fbx", "pc/meshes/tree.mat", "pc/meshes/tree.mesh"]
        );
    }

    #[test]
    fn test_legacy_sub_ids() {
        let fx = Fixture::new();
        let mut sub_ids = Vec::new();
        fx.db
            .query_legacy_sub_ids_by_product_id(fx.tree_mesh.product_id, |l| {
                sub_ids.push(l.sub_id);
                true
            })
            .unwrap();
        assert_eq!(sub_ids, vec![1000]);
    }
}
