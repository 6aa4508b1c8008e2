//! Job criteria applied to product and combined rows after they are read.

use uuid::Uuid;

use crate::entry::{JobEntry, JobStatus};

/// Post-filter over the job part of a result row.
///
/// Unset criteria match everything. A non-empty `platform` also selects
/// the platform-restricted statement variant of the query it is passed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub builder_guid: Option<Uuid>,
    pub job_key: Option<String>,
    pub platform: Option<String>,
    pub status: JobStatus,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder(mut self, guid: Uuid) -> Self {
        self.builder_guid = Some(guid);
        self
    }

    pub fn job_key(mut self, key: impl Into<String>) -> Self {
        self.job_key = Some(key.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// The platform to bind, if the platform variant should run.
    pub fn platform_filter(&self) -> Option<&str> {
        self.platform.as_deref().filter(|p| !p.is_empty())
    }

    pub fn matches(&self, job: &JobEntry) -> bool {
        let key_ok = self.job_key.as_ref().is_none_or(|key| *key == job.job_key);
        let builder_ok = self
            .builder_guid
            .is_none_or(|guid| guid.is_nil() || guid == job.builder_guid);
        let status_ok = self.status == JobStatus::Any || self.status == job.status;
        key_ok && builder_ok && status_ok
    }
}
