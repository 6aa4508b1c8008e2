//! Enumerations and bitsets stored in entry columns.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use rusqlite::types::{FromSqlError, FromSqlResult, Value, ValueRef};
use serde::{Deserialize, Serialize};

use super::ColumnValue;

/// Build status of a job.
///
/// `Any` only exists for queries: it matches every status and is refused
/// when writing a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Any,
    Queued,
    InProgress,
    Failed,
    FailedInvalidSourceNameExceedsMaxLimit,
    Completed,
    Missing,
}

impl JobStatus {
    pub fn as_i64(&self) -> i64 {
        match self {
            JobStatus::Any => -1,
            JobStatus::Queued => 0,
            JobStatus::InProgress => 1,
            JobStatus::Failed => 2,
            JobStatus::FailedInvalidSourceNameExceedsMaxLimit => 3,
            JobStatus::Completed => 4,
            JobStatus::Missing => 5,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_i64() == value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Any => "any",
            JobStatus::Queued => "queued",
            JobStatus::InProgress => "in_progress",
            JobStatus::Failed => "failed",
            JobStatus::FailedInvalidSourceNameExceedsMaxLimit => "failed_invalid_source_name",
            JobStatus::Completed => "completed",
            JobStatus::Missing => "missing",
        }
    }

    pub fn all() -> &'static [JobStatus] {
        &[
            JobStatus::Any,
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Failed,
            JobStatus::FailedInvalidSourceNameExceedsMaxLimit,
            JobStatus::Completed,
            JobStatus::Missing,
        ]
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            JobStatus::Failed | JobStatus::FailedInvalidSourceNameExceedsMaxLimit
        )
    }
}

impl FromStr for JobStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "any" | "*" => Ok(JobStatus::Any),
            "queued" => Ok(JobStatus::Queued),
            "in_progress" | "inprogress" => Ok(JobStatus::InProgress),
            "failed" => Ok(JobStatus::Failed),
            "failed_invalid_source_name" => Ok(JobStatus::FailedInvalidSourceNameExceedsMaxLimit),
            "completed" | "complete" => Ok(JobStatus::Completed),
            "missing" => Ok(JobStatus::Missing),
            _ => Err(crate::Error::InvalidValue(format!("Unknown job status: {}", s))),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnValue for JobStatus {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(JobStatus::Any),
            ValueRef::Integer(i) => JobStatus::from_i64(i).ok_or(FromSqlError::OutOfRange(i)),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Integer(self.as_i64())
    }
}

/// Bitmask describing how one source depends on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DependencyType(u32);

impl DependencyType {
    pub const SOURCE_TO_SOURCE: Self = Self(1 << 0);
    pub const JOB_TO_JOB: Self = Self(1 << 1);
    pub const SOURCE_OR_JOB: Self = Self(Self::SOURCE_TO_SOURCE.0 | Self::JOB_TO_JOB.0);
    /// The stored `DependsOnSource` is a LIKE pattern rather than a name.
    pub const SOURCE_LIKE_MATCH: Self = Self(1 << 2);
    /// Query wildcard, never stored.
    pub const ANY: Self = Self(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: DependencyType) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(&self, other: DependencyType) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_any(&self) -> bool {
        *self == Self::ANY
    }
}

impl BitOr for DependencyType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl FromStr for DependencyType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "source" | "source-to-source" => Ok(Self::SOURCE_TO_SOURCE),
            "job" | "job-to-job" => Ok(Self::JOB_TO_JOB),
            "source-or-job" => Ok(Self::SOURCE_OR_JOB),
            "like" | "wildcard" => Ok(Self::SOURCE_LIKE_MATCH),
            "any" => Ok(Self::ANY),
            other => other
                .parse::<u32>()
                .map(Self)
                .map_err(|_| crate::Error::InvalidValue(format!("Unknown dependency type: {}", s))),
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return write!(f, "any");
        }
        let names: Vec<&str> = [
            (Self::SOURCE_TO_SOURCE, "source"),
            (Self::JOB_TO_JOB, "job"),
            (Self::SOURCE_LIKE_MATCH, "like"),
        ]
        .iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| *name)
        .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

impl ColumnValue for DependencyType {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        u32::from_column(value).map(Self)
    }

    fn to_column(&self) -> Value {
        self.0.to_column()
    }
}

/// What an unresolved product dependency path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedDependencyType {
    #[default]
    ProductFile,
    SourceFile,
}

impl UnresolvedDependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnresolvedDependencyType::ProductFile => "product",
            UnresolvedDependencyType::SourceFile => "source",
        }
    }
}

impl fmt::Display for UnresolvedDependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnValue for UnresolvedDependencyType {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null | ValueRef::Integer(0) => Ok(UnresolvedDependencyType::ProductFile),
            ValueRef::Integer(1) => Ok(UnresolvedDependencyType::SourceFile),
            ValueRef::Integer(i) => Err(FromSqlError::OutOfRange(i)),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        match self {
            UnresolvedDependencyType::ProductFile => Value::Integer(0),
            UnresolvedDependencyType::SourceFile => Value::Integer(1),
        }
    }
}

/// Up to 64 per-edge flags of a product dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DependencyFlags(u64);

impl DependencyFlags {
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub fn with(mut self, bit: u32) -> crate::Result<Self> {
        self.set(bit, true)?;
        Ok(self)
    }

    /// Fails with `InvalidValue` for bits past 63.
    pub fn set(&mut self, bit: u32, on: bool) -> crate::Result<()> {
        let mask = 1u64
            .checked_shl(bit)
            .ok_or_else(|| crate::Error::InvalidValue(format!("dependency flag bit {} out of range", bit)))?;
        if on {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
        Ok(())
    }

    pub fn test(&self, bit: u32) -> bool {
        1u64.checked_shl(bit).is_some_and(|mask| self.0 & mask != 0)
    }
}

impl fmt::Display for DependencyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

impl ColumnValue for DependencyFlags {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        u64::from_column(value).map(Self)
    }

    fn to_column(&self) -> Value {
        self.0.to_column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_roundtrip() {
        for status in JobStatus::all() {
            assert_eq!(JobStatus::from_i64(status.as_i64()), Some(*status));
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), *status);
        }
        assert_eq!(JobStatus::from_i64(99), None);
    }

    #[test]
    fn test_dependency_type_bits() {
        assert_eq!(DependencyType::SOURCE_OR_JOB.bits(), 3);
        assert!(DependencyType::SOURCE_OR_JOB.contains(DependencyType::JOB_TO_JOB));
        assert!(!DependencyType::SOURCE_TO_SOURCE.intersects(DependencyType::SOURCE_LIKE_MATCH));
        assert!(DependencyType::ANY.contains(DependencyType::SOURCE_LIKE_MATCH));
        assert_eq!(
            DependencyType::SOURCE_TO_SOURCE | DependencyType::SOURCE_LIKE_MATCH,
            DependencyType::from_bits(5)
        );
        assert_eq!(DependencyType::SOURCE_OR_JOB.to_string(), "source|job");
    }

    #[test]
    fn test_dependency_flags() {
        let mut flags = DependencyFlags::default().with(0).unwrap().with(63).unwrap();
        assert!(flags.test(0));
        assert!(flags.test(63));
        flags.set(0, false).unwrap();
        assert!(!flags.test(0));
        assert_eq!(flags.bits(), 1u64 << 63);
    }

    #[test]
    fn test_dependency_flag_bit_out_of_range() {
        let mut flags = DependencyFlags::default();
        assert!(matches!(flags.set(64, true), Err(crate::Error::InvalidValue(_))));
        assert!(DependencyFlags::default().with(100).is_err());
        assert_eq!(flags.bits(), 0);
        assert!(!flags.test(64));
    }
}
