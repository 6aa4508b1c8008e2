use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::columns::column;
use super::{Column, Entry, JobStatus};
use crate::{Error, Result};

/// One build attempt of a source by one builder for one platform.
///
/// Equality covers every field except the id, which is how a rerun that
/// produced the same job is detected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    pub job_id: i64,
    pub source_pk: i64,
    pub job_key: String,
    pub fingerprint: u32,
    pub platform: String,
    pub builder_guid: Uuid,
    pub status: JobStatus,
    pub job_run_key: u64,
    pub first_fail_log_time: i64,
    pub first_fail_log_file: String,
    pub last_fail_log_time: i64,
    pub last_fail_log_file: String,
    pub last_log_time: i64,
    pub last_log_file: String,
}

impl JobEntry {
    pub fn new(
        source_pk: i64,
        job_key: impl Into<String>,
        fingerprint: u32,
        platform: impl Into<String>,
        builder_guid: Uuid,
        status: JobStatus,
        job_run_key: u64,
    ) -> Self {
        Self {
            job_id: -1,
            source_pk,
            job_key: job_key.into(),
            fingerprint,
            platform: platform.into(),
            builder_guid,
            status,
            job_run_key,
            first_fail_log_time: 0,
            first_fail_log_file: String::new(),
            last_fail_log_time: 0,
            last_fail_log_file: String::new(),
            last_log_time: 0,
            last_log_file: String::new(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.job_id = id;
        self
    }

    /// Record a failure log, keeping the first failure if one is already set.
    pub fn record_failure(&mut self, time: i64, file: impl Into<String>) {
        let file = file.into();
        if self.first_fail_log_file.is_empty() {
            self.first_fail_log_time = time;
            self.first_fail_log_file = file.clone();
        }
        self.last_fail_log_time = time;
        self.last_fail_log_file = file;
    }
}

impl PartialEq for JobEntry {
    fn eq(&self, other: &Self) -> bool {
        self.source_pk == other.source_pk
            && self.job_key == other.job_key
            && self.fingerprint == other.fingerprint
            && self.platform == other.platform
            && self.builder_guid == other.builder_guid
            && self.status == other.status
            && self.job_run_key == other.job_run_key
            && self.first_fail_log_time == other.first_fail_log_time
            && self.first_fail_log_file == other.first_fail_log_file
            && self.last_fail_log_time == other.last_fail_log_time
            && self.last_fail_log_file == other.last_fail_log_file
            && self.last_log_time == other.last_log_time
            && self.last_log_file == other.last_log_file
    }
}

impl Eq for JobEntry {}

impl Default for JobEntry {
    fn default() -> Self {
        Self::new(-1, "", 0, "", Uuid::nil(), JobStatus::Any, 0)
    }
}

impl fmt::Display for JobEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job id:{} source:{} key:{} platform:{} builder:{} status:{} runkey:{} fingerprint:{}",
            self.job_id,
            self.source_pk,
            self.job_key,
            self.platform,
            self.builder_guid,
            self.status,
            self.job_run_key,
            self.fingerprint
        )
    }
}

impl Entry for JobEntry {
    const TABLE: &'static str = "Jobs";
    const COLUMNS: &'static [Column<Self>] = &[
        column!("JobID" => job_id),
        column!("SourcePK" => source_pk),
        column!("JobKey" => job_key),
        column!("Fingerprint" => fingerprint),
        column!("Platform" => platform),
        column!("BuilderGuid" => builder_guid),
        column!("Status" => status),
        column!("JobRunKey" => job_run_key),
        column!("FirstFailLogTime" => first_fail_log_time),
        column!("FirstFailLogFile" => first_fail_log_file),
        column!("LastFailLogTime" => last_fail_log_time),
        column!("LastFailLogFile" => last_fail_log_file),
        column!("LastLogTime" => last_log_time),
        column!("LastLogFile" => last_log_file),
    ];

    fn id(&self) -> i64 {
        self.job_id
    }

    fn set_id(&mut self, id: i64) {
        self.job_id = id;
    }

    fn validate(&self) -> Result<()> {
        if self.status == JobStatus::Any {
            return Err(Error::InvalidEntry(format!(
                "job {} for {} has the wildcard status",
                self.job_key, self.platform
            )));
        }
        Ok(())
    }
}

/// Flat view of a job used by tooling to show build state and log locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub job_id: i64,
    pub source_file: String,
    pub watch_folder: Option<String>,
    pub platform: String,
    pub builder_guid: Uuid,
    pub job_key: String,
    pub status: JobStatus,
    pub job_run_key: u64,
    pub first_fail_log_time: i64,
    pub first_fail_log_file: String,
    pub last_fail_log_time: i64,
    pub last_fail_log_file: String,
    pub last_log_time: i64,
    pub last_log_file: String,
}

impl JobInfo {
    pub fn from_job(job: JobEntry, source_file: String, watch_folder: Option<String>) -> Self {
        Self {
            job_id: job.job_id,
            source_file,
            watch_folder,
            platform: job.platform,
            builder_guid: job.builder_guid,
            job_key: job.job_key,
            status: job.status,
            job_run_key: job.job_run_key,
            first_fail_log_time: job.first_fail_log_time,
            first_fail_log_file: job.first_fail_log_file,
            last_fail_log_time: job.last_fail_log_time,
            last_fail_log_file: job.last_fail_log_file,
            last_log_time: job.last_log_time,
            last_log_file: job.last_log_file,
        }
    }
}

impl fmt::Display for JobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} ({})",
            self.source_file, self.platform, self.job_key, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> JobEntry {
        let mut job = JobEntry::new(
            7,
            "Compile",
            1234,
            "pc",
            Uuid::from_u128(0xfeed),
            JobStatus::Completed,
            99,
        );
        job.last_log_time = 500;
        job.last_log_file = "logs/compile.log".to_string();
        job
    }

    #[test]
    fn test_job_equality_ignores_id() {
        let a = sample_job().with_id(1);
        let b = sample_job().with_id(2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_job_equality_considers_every_field() {
        let base = sample_job();
        let mut other = sample_job();
        other.job_run_key = 100;
        assert_ne!(base, other);

        let mut other = sample_job();
        other.last_fail_log_file = "logs/fail.log".to_string();
        assert_ne!(base, other);
    }

    #[test]
    fn test_wildcard_status_is_not_storable() {
        let mut job = sample_job();
        assert!(job.validate().is_ok());
        job.status = JobStatus::Any;
        assert!(matches!(job.validate(), Err(Error::InvalidEntry(_))));
    }

    #[test]
    fn test_record_failure_keeps_first() {
        let mut job = sample_job();
        job.record_failure(10, "first.log");
        job.record_failure(20, "second.log");
        assert_eq!(job.first_fail_log_file, "first.log");
        assert_eq!(job.first_fail_log_time, 10);
        assert_eq!(job.last_fail_log_file, "second.log");
    }
}
