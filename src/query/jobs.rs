//! Job lookups and the flat `JobInfo` projection.

use super::catalog::{self, SqlQuery, SqlValue};
use super::filter::JobFilter;
use crate::entry::{Entry, JobEntry, JobInfo, ScanFolderEntry, SourceEntry};
use crate::storage::AssetDatabase;
use crate::Result;

impl AssetDatabase {
    /// Every job, restricted by `filter`.
    pub fn query_jobs_table(&self, filter: &JobFilter, handler: impl FnMut(JobEntry) -> bool) -> Result<()> {
        self.visit_jobs(&catalog::JOBS_TABLE, &catalog::JOBS_TABLE_PLATFORM, &[], filter, handler)
    }

    pub fn query_job_by_id(&self, job_id: i64, handler: impl FnMut(JobEntry) -> bool) -> Result<()> {
        self.run(&catalog::JOB_BY_ID, &[SqlValue::Integer(job_id)], JobEntry::from_row, handler)
    }

    pub fn query_jobs_by_job_key(&self, job_key: &str, handler: impl FnMut(JobEntry) -> bool) -> Result<()> {
        self.run(&catalog::JOB_BY_JOB_KEY, &[SqlValue::Text(job_key)], JobEntry::from_row, handler)
    }

    pub fn query_job_by_run_key(&self, job_run_key: u64, handler: impl FnMut(JobEntry) -> bool) -> Result<()> {
        self.run(
            &catalog::JOB_BY_RUN_KEY,
            &[SqlValue::Integer(job_run_key as i64)],
            JobEntry::from_row,
            handler,
        )
    }

    pub fn query_job_by_product_id(&self, product_id: i64, handler: impl FnMut(JobEntry) -> bool) -> Result<()> {
        self.run(
            &catalog::JOB_BY_PRODUCT_ID,
            &[SqlValue::Integer(product_id)],
            JobEntry::from_row,
            handler,
        )
    }

    pub fn query_jobs_by_source_id(
        &self,
        source_id: i64,
        filter: &JobFilter,
        handler: impl FnMut(JobEntry) -> bool,
    ) -> Result<()> {
        self.visit_jobs(
            &catalog::JOB_BY_SOURCE_ID,
            &catalog::JOB_BY_SOURCE_ID_PLATFORM,
            &[SqlValue::Integer(source_id)],
            filter,
            handler,
        )
    }

    fn visit_jobs(
        &self,
        query: &'static SqlQuery,
        platform_query: &'static SqlQuery,
        args: &[SqlValue<'_>],
        filter: &JobFilter,
        mut handler: impl FnMut(JobEntry) -> bool,
    ) -> Result<()> {
        let visit = |job: JobEntry| if filter.matches(&job) { handler(job) } else { true };
        match filter.platform_filter() {
            Some(platform) => {
                let mut bound = args.to_vec();
                bound.push(SqlValue::Text(platform));
                self.run(platform_query, &bound, JobEntry::from_row, visit)
            }
            None => self.run(query, args, JobEntry::from_row, visit),
        }
    }

    // ========== Job Info ==========

    pub fn query_job_info_by_job_id(&self, job_id: i64, handler: impl FnMut(JobInfo) -> bool) -> Result<()> {
        let jobs = self.collect(&catalog::JOB_BY_ID, &[SqlValue::Integer(job_id)], JobEntry::from_row)?;
        self.emit_job_infos(jobs, handler)
    }

    /// All jobs of one build batch.
    pub fn query_job_info_by_run_key(&self, job_run_key: u64, handler: impl FnMut(JobInfo) -> bool) -> Result<()> {
        let jobs = self.collect(
            &catalog::JOB_BY_RUN_KEY,
            &[SqlValue::Integer(job_run_key as i64)],
            JobEntry::from_row,
        )?;
        self.emit_job_infos(jobs, handler)
    }

    pub fn query_job_info_by_job_key(&self, job_key: &str, handler: impl FnMut(JobInfo) -> bool) -> Result<()> {
        let jobs = self.collect(&catalog::JOB_BY_JOB_KEY, &[SqlValue::Text(job_key)], JobEntry::from_row)?;
        self.emit_job_infos(jobs, handler)
    }

    /// Jobs of every source with this exact name, restricted by `filter`.
    pub fn query_job_info_by_source_name(
        &self,
        source_name: &str,
        filter: &JobFilter,
        handler: impl FnMut(JobInfo) -> bool,
    ) -> Result<()> {
        let sources = self.collect(&catalog::SOURCE_BY_NAME, &[SqlValue::Text(source_name)], SourceEntry::from_row)?;
        let mut jobs = Vec::new();
        for source in &sources {
            self.query_jobs_by_source_id(source.source_id, filter, |job| {
                jobs.push(job);
                true
            })?;
        }
        self.emit_job_infos(jobs, handler)
    }

    fn emit_job_infos(&self, jobs: Vec<JobEntry>, mut handler: impl FnMut(JobInfo) -> bool) -> Result<()> {
        for job in jobs {
            if !handler(self.job_info(job)?) {
                break;
            }
        }
        Ok(())
    }

    /// Attach the source name and scan folder path to a job.
    pub fn job_info(&self, job: JobEntry) -> Result<JobInfo> {
        let source = self.first(&catalog::SOURCE_BY_ID, &[SqlValue::Integer(job.source_pk)], SourceEntry::from_row)?;
        let Some(source) = source else {
            return Ok(JobInfo::from_job(job, String::new(), None));
        };
        let scan_folder = self.first(
            &catalog::SCAN_FOLDER_BY_ID,
            &[SqlValue::Integer(source.scan_folder_pk)],
            ScanFolderEntry::from_row,
        )?;
        Ok(JobInfo::from_job(
            job,
            source.source_name,
            scan_folder.map(|f| f.scan_folder),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JobStatus;
    use crate::query::fixtures::Fixture;

    fn job_ids(db: &AssetDatabase, filter: &JobFilter) -> Vec<i64> {
        let mut ids = Vec::new();
        db.query_jobs_table(filter, |job| {
            ids.push(job.job_id);
            true
        })
        .unwrap();
        ids.sort();
        ids
    }

    #[test]
    fn test_jobs_table_filters() {
        let fx = Fixture::new();

        assert_eq!(job_ids(&fx.db, &JobFilter::default()).len(), 5);
        assert_eq!(
            job_ids(&fx.db, &JobFilter::new().platform("android")),
            vec![fx.rock_android.job_id]
        );
        assert_eq!(
            job_ids(&fx.db, &JobFilter::new().job_key("Copy")),
            vec![fx.tree_copy.job_id]
        );
        assert_eq!(
            job_ids(&fx.db, &JobFilter::new().platform("pc").builder(fx.builder).status(JobStatus::Completed)),
            vec![fx.rock_pc.job_id, fx.tree_compile.job_id, fx.done_pc.job_id]
        );
    }

    #[test]
    fn test_job_lookups() {
        let fx = Fixture::new();
        let mut found = Vec::new();
        fx.db
            .query_job_by_id(fx.tree_copy.job_id, |j| {
                found.push(j);
                true
            })
            .unwrap();
        fx.db
            .query_job_by_run_key(2, |j| {
                found.push(j);
                true
            })
            .unwrap();
        fx.db
            .query_job_by_product_id(fx.tree_mat.product_id, |j| {
                found.push(j);
                true
            })
            .unwrap();
        assert_eq!(found, vec![fx.tree_copy.clone(), fx.rock_android.clone(), fx.tree_compile.clone()]);

        let mut count = 0;
        fx.db
            .query_jobs_by_job_key("Compile", |_| {
                count += 1;
                true
            })
            .unwrap();
        assert_eq!(count, 4);

        let mut by_source = Vec::new();
        fx.db
            .query_jobs_by_source_id(fx.rock.source_id, &JobFilter::new().platform("pc"), |j| {
                by_source.push(j);
                true
            })
            .unwrap();
        assert_eq!(by_source, vec![fx.rock_pc.clone()]);
    }

    #[test]
    fn test_job_info_projection() {
        let fx = Fixture::new();
        let mut infos = Vec::new();
        fx.db
            .query_job_info_by_job_id(fx.done_pc.job_id, |info| {
                infos.push(info);
                true
            })
            .unwrap();

        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].source_file, "docs/100%_done.txt");
        assert_eq!(infos[0].watch_folder.as_deref(), Some("/game/gems"));
        assert_eq!(infos[0].status, JobStatus::Completed);
    }

    #[test]
    fn test_job_info_by_source_name_with_filter() {
        let fx = Fixture::new();
        let mut infos = Vec::new();
        fx.db
            .query_job_info_by_source_name(
                "textures/rock.png",
                &JobFilter::new().status(JobStatus::Failed),
                |info| {
                    infos.push(info);
                    true
                },
            )
            .unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].job_id, fx.rock_android.job_id);
        assert_eq!(infos[0].platform, "android");
    }
}
