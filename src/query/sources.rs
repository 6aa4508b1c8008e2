//! Source lookups, including source-to-source dependency edges.

use super::catalog::{self, SqlValue};
use super::like::LikeType;
use crate::entry::{DependencyType, Entry, SourceAndScanFolderEntry, SourceEntry, SourceFileDependencyEntry};
use crate::storage::AssetDatabase;
use crate::Result;
use uuid::Uuid;

impl AssetDatabase {
    pub fn query_sources_table(&self, handler: impl FnMut(SourceEntry) -> bool) -> Result<()> {
        self.run(&catalog::SOURCES_TABLE, &[], SourceEntry::from_row, handler)
    }

    pub fn query_source_by_id(&self, source_id: i64, handler: impl FnMut(SourceEntry) -> bool) -> Result<()> {
        self.run(
            &catalog::SOURCE_BY_ID,
            &[SqlValue::Integer(source_id)],
            SourceEntry::from_row,
            handler,
        )
    }

    pub fn query_sources_by_scan_folder_id(
        &self,
        scan_folder_id: i64,
        handler: impl FnMut(SourceEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SOURCE_BY_SCAN_FOLDER_ID,
            &[SqlValue::Integer(scan_folder_id)],
            SourceEntry::from_row,
            handler,
        )
    }

    pub fn query_source_by_guid(&self, source_guid: Uuid, handler: impl FnMut(SourceEntry) -> bool) -> Result<()> {
        self.run(
            &catalog::SOURCE_BY_GUID,
            &[SqlValue::Guid(source_guid)],
            SourceEntry::from_row,
            handler,
        )
    }

    /// Sources with exactly this name, optionally restricted to one scan folder.
    pub fn query_sources_by_name(
        &self,
        source_name: &str,
        scan_folder_id: Option<i64>,
        handler: impl FnMut(SourceEntry) -> bool,
    ) -> Result<()> {
        match scan_folder_id {
            Some(id) => self.run(
                &catalog::SOURCE_BY_NAME_SCAN_FOLDER_ID,
                &[SqlValue::Text(source_name), SqlValue::Integer(id)],
                SourceEntry::from_row,
                handler,
            ),
            None => self.run(
                &catalog::SOURCE_BY_NAME,
                &[SqlValue::Text(source_name)],
                SourceEntry::from_row,
                handler,
            ),
        }
    }

    pub fn query_sources_like_name(
        &self,
        source_name: &str,
        like: LikeType,
        handler: impl FnMut(SourceEntry) -> bool,
    ) -> Result<()> {
        let pattern = like.pattern(source_name);
        self.run(
            &catalog::SOURCE_LIKE_NAME,
            &[SqlValue::Text(&pattern)],
            SourceEntry::from_row,
            handler,
        )
    }

    pub fn query_source_by_job_id(&self, job_id: i64, handler: impl FnMut(SourceEntry) -> bool) -> Result<()> {
        self.run(
            &catalog::SOURCE_BY_JOB_ID,
            &[SqlValue::Integer(job_id)],
            SourceEntry::from_row,
            handler,
        )
    }

    pub fn query_source_by_product_id(
        &self,
        product_id: i64,
        handler: impl FnMut(SourceEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SOURCE_BY_PRODUCT_ID,
            &[SqlValue::Integer(product_id)],
            SourceEntry::from_row,
            handler,
        )
    }

    /// Every source paired with the scan folder it lives in.
    pub fn query_source_and_scan_folders(
        &self,
        handler: impl FnMut(SourceAndScanFolderEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SOURCES_AND_SCAN_FOLDERS,
            &[],
            SourceAndScanFolderEntry::from_row,
            handler,
        )
    }

    /// Stored analysis fingerprint of a source, `None` when the source is unknown.
    pub fn query_source_analysis_fingerprint(
        &self,
        source_name: &str,
        scan_folder_id: i64,
    ) -> Result<Option<String>> {
        self.first(
            &catalog::SOURCE_ANALYSIS_FINGERPRINT,
            &[SqlValue::Text(source_name), SqlValue::Integer(scan_folder_id)],
            |row| row.get::<_, String>("AnalysisFingerprint"),
        )
    }

    // ========== Source Dependencies ==========

    pub fn query_source_dependency_by_id(
        &self,
        source_dependency_id: i64,
        handler: impl FnMut(SourceFileDependencyEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::SOURCE_DEPENDENCY_BY_ID,
            &[SqlValue::Integer(source_dependency_id)],
            SourceFileDependencyEntry::from_row,
            handler,
        )
    }

    /// Edges pointing at `depends_on_source` (who depends on this file).
    ///
    /// When `dependency_type` includes [`DependencyType::SOURCE_LIKE_MATCH`],
    /// the rest of the mask is ignored: every exact source-to-source and
    /// job-to-job edge is returned, plus the stored wildcard edges whose
    /// pattern matches `depends_on_source`. `dependent_filter` is a LIKE
    /// pattern over the dependent source name, `None` for all.
    pub fn query_source_dependencies_by_depends_on_source(
        &self,
        depends_on_source: &str,
        dependency_type: DependencyType,
        dependent_filter: Option<&str>,
        handler: impl FnMut(SourceFileDependencyEntry) -> bool,
    ) -> Result<()> {
        let filter = dependent_filter.unwrap_or("%");
        if dependency_type.contains(DependencyType::SOURCE_LIKE_MATCH) {
            self.run(
                &catalog::SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE_WILDCARD,
                &[
                    SqlValue::Text(depends_on_source),
                    SqlValue::Mask(DependencyType::SOURCE_OR_JOB.bits()),
                    SqlValue::Mask(DependencyType::SOURCE_LIKE_MATCH.bits()),
                    SqlValue::Text(filter),
                ],
                SourceFileDependencyEntry::from_row,
                handler,
            )
        } else {
            self.run(
                &catalog::SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE,
                &[
                    SqlValue::Text(depends_on_source),
                    SqlValue::Mask(dependency_type.bits()),
                    SqlValue::Text(filter),
                ],
                SourceFileDependencyEntry::from_row,
                handler,
            )
        }
    }

    /// Edges out of `source` (what this file depends on).
    pub fn query_depends_on_source_by_source(
        &self,
        source: &str,
        dependency_type: DependencyType,
        dependency_filter: Option<&str>,
        handler: impl FnMut(SourceFileDependencyEntry) -> bool,
    ) -> Result<()> {
        self.run(
            &catalog::DEPENDS_ON_SOURCE_BY_SOURCE,
            &[
                SqlValue::Text(source),
                SqlValue::Mask(dependency_type.bits()),
                SqlValue::Text(dependency_filter.unwrap_or("%")),
            ],
            SourceFileDependencyEntry::from_row,
            handler,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::Fixture;

    fn names(db: &AssetDatabase, text: &str, like: LikeType) -> Vec<String> {
        let mut names = Vec::new();
        db.query_sources_like_name(text, like, |s| {
            names.push(s.source_name);
            true
        })
        .unwrap();
        names.sort();
        names
    }

    #[test]
    fn test_like_name_escapes_wildcards() {
        let fx = Fixture::new();
        assert_eq!(names(&fx.db, "%", LikeType::Matches), vec!["docs/100%_done.txt"]);
        assert_eq!(names(&fx.db, "_", LikeType::Matches), vec!["docs/100%_done.txt"]);
        assert_eq!(names(&fx.db, "textures/", LikeType::StartsWith), vec!["textures/rock.png"]);
        assert_eq!(names(&fx.db, ".fbx", LikeType::EndsWith), vec!["meshes/tree.fbx"]);
        assert_eq!(names(&fx.db, "%s/%", LikeType::Raw).len(), 3);
    }

    #[test]
    fn test_lookup_by_name_and_folder() {
        let fx = Fixture::new();

        let mut found = Vec::new();
        fx.db
            .query_sources_by_name("textures/rock.png", Some(fx.assets.scan_folder_id), |s| {
                found.push(s);
                true
            })
            .unwrap();
        assert_eq!(found, vec![fx.rock.clone()]);

        found.clear();
        fx.db
            .query_sources_by_name("textures/rock.png", Some(fx.gems.scan_folder_id), |s| {
                found.push(s);
                true
            })
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_lookup_by_guid_job_and_product() {
        let fx = Fixture::new();
        let mut found = Vec::new();
        fx.db
            .query_source_by_guid(fx.tree.source_guid, |s| {
                found.push(s);
                true
            })
            .unwrap();
        fx.db
            .query_source_by_job_id(fx.rock_android.job_id, |s| {
                found.push(s);
                true
            })
            .unwrap();
        fx.db
            .query_source_by_product_id(fx.done_txt.product_id, |s| {
                found.push(s);
                true
            })
            .unwrap();
        assert_eq!(found, vec![fx.tree.clone(), fx.rock.clone(), fx.done.clone()]);
    }

    #[test]
    fn test_source_and_scan_folder_paths() {
        let fx = Fixture::new();
        let mut paths = Vec::new();
        fx.db
            .query_source_and_scan_folders(|entry| {
                paths.push(entry.full_path());
                true
            })
            .unwrap();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "/game/assets/meshes/tree.fbx",
                "/game/assets/textures/rock.png",
                "/game/gems/docs/100%_done.txt",
            ]
        );
    }

    #[test]
    fn test_analysis_fingerprint() {
        let fx = Fixture::new();
        let fingerprint = fx
            .db
            .query_source_analysis_fingerprint("meshes/tree.fbx", fx.assets.scan_folder_id)
            .unwrap();
        assert_eq!(fingerprint.as_deref(), Some("fp"));
        assert!(fx
            .db
            .query_source_analysis_fingerprint("meshes/tree.fbx", fx.gems.scan_folder_id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_source_dependencies_both_directions() {
        let fx = Fixture::new();
        let builder = fx.builder;
        let edges = [
            SourceFileDependencyEntry::new(builder, "levels/a.level", "textures/rock.png", DependencyType::SOURCE_TO_SOURCE),
            SourceFileDependencyEntry::new(builder, "levels/b.level", "textures/rock.png", DependencyType::JOB_TO_JOB),
            SourceFileDependencyEntry::new(builder, "levels/c.level", "textures/%.png", DependencyType::SOURCE_LIKE_MATCH),
            SourceFileDependencyEntry::new(builder, "levels/a.level", "meshes/tree.fbx", DependencyType::SOURCE_TO_SOURCE),
        ];
        for mut edge in edges {
            fx.db.set_entry(&mut edge).unwrap();
        }

        let dependents = |ty: DependencyType, filter: Option<&str>| {
            let mut out = Vec::new();
            fx.db
                .query_source_dependencies_by_depends_on_source("textures/rock.png", ty, filter, |e| {
                    out.push(e.source);
                    true
                })
                .unwrap();
            out.sort();
            out
        };

        assert_eq!(dependents(DependencyType::SOURCE_TO_SOURCE, None), vec!["levels/a.level"]);
        assert_eq!(
            dependents(DependencyType::SOURCE_OR_JOB, None),
            vec!["levels/a.level", "levels/b.level"]
        );
        assert_eq!(dependents(DependencyType::SOURCE_OR_JOB, Some("%b.level")), vec!["levels/b.level"]);

        let mut depends_on = Vec::new();
        fx.db
            .query_depends_on_source_by_source("levels/a.level", DependencyType::ANY, None, |e| {
                depends_on.push(e.depends_on_source);
                true
            })
            .unwrap();
        depends_on.sort();
        assert_eq!(depends_on, vec!["meshes/tree.fbx", "textures/rock.png"]);
    }

    #[test]
    fn test_like_match_lookup_returns_exact_and_matching_pattern_edges() {
        let fx = Fixture::new();
        let builder = fx.builder;
        let edges = [
            SourceFileDependencyEntry::new(builder, "levels/a.level", "textures/rock.png", DependencyType::SOURCE_TO_SOURCE),
            SourceFileDependencyEntry::new(builder, "levels/b.level", "textures/rock.png", DependencyType::JOB_TO_JOB),
            SourceFileDependencyEntry::new(builder, "levels/c.level", "textures/%.png", DependencyType::SOURCE_LIKE_MATCH),
            SourceFileDependencyEntry::new(builder, "levels/d.level", "meshes/%.png", DependencyType::SOURCE_LIKE_MATCH),
        ];
        for mut edge in edges {
            fx.db.set_entry(&mut edge).unwrap();
        }

        let dependents = |ty: DependencyType| {
            let mut out = Vec::new();
            fx.db
                .query_source_dependencies_by_depends_on_source("textures/rock.png", ty, None, |e| {
                    out.push(e.source);
                    true
                })
                .unwrap();
            out.sort();
            out
        };

        let expected = vec!["levels/a.level", "levels/b.level", "levels/c.level"];
        assert_eq!(dependents(DependencyType::SOURCE_LIKE_MATCH), expected);
        assert_eq!(
            dependents(DependencyType::SOURCE_TO_SOURCE | DependencyType::SOURCE_LIKE_MATCH),
            expected
        );
    }

    #[test]
    fn test_wildcard_type_is_not_persisted() {
        let fx = Fixture::new();
        let mut edge = SourceFileDependencyEntry::new(fx.builder, "a", "b", DependencyType::ANY);
        assert!(fx.db.set_entry(&mut edge).is_err());
    }
}
