//! Named query catalog
//!
//! Every statement the query layer runs is declared here with its parameters
//! and the columns its rows must provide. [`crate::AssetDatabase`] prepares
//! the whole catalog when it opens and checks each statement against its
//! declaration, so a shape mismatch fails the open rather than a later query.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use uuid::Uuid;

use crate::entry::{
    CombinedEntry, DatabaseInfoEntry, Entry, FileEntry, JobEntry, LegacySubIdEntry,
    ProductDependencyEntry, ProductEntry, ScanFolderEntry, SourceAndScanFolderEntry, SourceEntry,
    SourceFileDependencyEntry, BuilderInfoEntry,
};

/// Semantic type of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Text,
    Guid,
    Mask,
}

/// A named placeholder of a catalog statement.
#[derive(Debug, Clone, Copy)]
pub struct SqlParam {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl SqlParam {
    pub const fn integer(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Integer }
    }

    pub const fn text(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Text }
    }

    pub const fn guid(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Guid }
    }

    pub const fn mask(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Mask }
    }
}

/// A catalog statement.
pub struct SqlQuery {
    pub name: &'static str,
    pub sql: &'static str,
    /// Bound positionally: argument `i` goes to `params[i]`.
    pub params: &'static [SqlParam],
    pub columns: fn() -> Vec<&'static str>,
}

/// An argument bound to a catalog statement.
#[derive(Debug, Clone, Copy)]
pub enum SqlValue<'a> {
    Integer(i64),
    Text(&'a str),
    Guid(Uuid),
    Mask(u32),
}

impl SqlValue<'_> {
    pub fn kind(&self) -> ParamKind {
        match self {
            SqlValue::Integer(_) => ParamKind::Integer,
            SqlValue::Text(_) => ParamKind::Text,
            SqlValue::Guid(_) => ParamKind::Guid,
            SqlValue::Mask(_) => ParamKind::Mask,
        }
    }
}

impl ToSql for SqlValue<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Guid(g) => ToSqlOutput::Owned(Value::Blob(g.as_bytes().to_vec())),
            SqlValue::Mask(m) => ToSqlOutput::Owned(Value::Integer(i64::from(*m))),
        })
    }
}

fn product_and_job_columns() -> Vec<&'static str> {
    [ProductEntry::column_names(), JobEntry::column_names()].concat()
}

fn product_dependency_and_asset_columns() -> Vec<&'static str> {
    let mut columns = ProductDependencyEntry::column_names();
    columns.extend(["SourceGuid", "SubID"]);
    columns
}

fn analysis_fingerprint_column() -> Vec<&'static str> {
    vec!["AnalysisFingerprint"]
}

macro_rules! products_sql {
    ($tail:literal) => {
        concat!(
            "SELECT Products.*, Jobs.* FROM Jobs ",
            "INNER JOIN Products ON Jobs.JobID = Products.JobPK ",
            $tail
        )
    };
}

macro_rules! products_by_source_sql {
    ($tail:literal) => {
        concat!(
            "SELECT Products.*, Jobs.* FROM Sources ",
            "INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK ",
            "INNER JOIN Products ON Jobs.JobID = Products.JobPK ",
            $tail
        )
    };
}

macro_rules! combined_sql {
    ($tail:literal) => {
        concat!(
            "SELECT * FROM ScanFolders ",
            "INNER JOIN Sources ON ScanFolders.ScanFolderID = Sources.ScanFolderPK ",
            "INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK ",
            "INNER JOIN Products ON Jobs.JobID = Products.JobPK",
            $tail
        )
    };
}

const PLATFORM: SqlParam = SqlParam::text(":platform");
const PRODUCT_ID: SqlParam = SqlParam::integer(":productid");
const SOURCE_ID: SqlParam = SqlParam::integer(":sourceid");
const JOB_ID: SqlParam = SqlParam::integer(":jobid");
const SCAN_FOLDER_ID: SqlParam = SqlParam::integer(":scanfolderid");
const SOURCE_NAME: SqlParam = SqlParam::text(":sourcename");
const PRODUCT_NAME: SqlParam = SqlParam::text(":productname");
const SOURCE_GUID: SqlParam = SqlParam::guid(":sourceguid");
const SUB_ID: SqlParam = SqlParam::integer(":subid");
const FILE_NAME: SqlParam = SqlParam::text(":filename");

// ========== Whole Tables ==========

pub const DATABASE_INFO_TABLE: SqlQuery = SqlQuery {
    name: "QueryDatabaseInfoTable",
    sql: "SELECT * FROM dbinfo",
    params: &[],
    columns: DatabaseInfoEntry::column_names,
};

pub const BUILDER_INFO_TABLE: SqlQuery = SqlQuery {
    name: "QueryBuilderInfoTable",
    sql: "SELECT * FROM BuilderInfo",
    params: &[],
    columns: BuilderInfoEntry::column_names,
};

pub const SCAN_FOLDERS_TABLE: SqlQuery = SqlQuery {
    name: "QueryScanFoldersTable",
    sql: "SELECT * FROM ScanFolders",
    params: &[],
    columns: ScanFolderEntry::column_names,
};

pub const SOURCES_TABLE: SqlQuery = SqlQuery {
    name: "QuerySourcesTable",
    sql: "SELECT * FROM Sources",
    params: &[],
    columns: SourceEntry::column_names,
};

pub const JOBS_TABLE: SqlQuery = SqlQuery {
    name: "QueryJobsTable",
    sql: "SELECT * FROM Jobs",
    params: &[],
    columns: JobEntry::column_names,
};

pub const JOBS_TABLE_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryJobsTablePlatform",
    sql: "SELECT * FROM Jobs WHERE Platform = :platform",
    params: &[PLATFORM],
    columns: JobEntry::column_names,
};

pub const PRODUCTS_TABLE: SqlQuery = SqlQuery {
    name: "QueryProductsTable",
    sql: products_sql!(""),
    params: &[],
    columns: product_and_job_columns,
};

pub const PRODUCTS_TABLE_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductsTablePlatform",
    sql: products_sql!("WHERE Jobs.Platform = :platform"),
    params: &[PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_DEPENDENCIES_TABLE: SqlQuery = SqlQuery {
    name: "QueryProductDependenciesTable",
    sql: "SELECT ProductDependencies.*, Sources.SourceGuid, Products.SubID FROM ProductDependencies \
          INNER JOIN Products ON ProductDependencies.ProductPK = Products.ProductID \
          INNER JOIN Jobs ON Products.JobPK = Jobs.JobID \
          INNER JOIN Sources ON Jobs.SourcePK = Sources.SourceID",
    params: &[],
    columns: product_dependency_and_asset_columns,
};

pub const FILES_TABLE: SqlQuery = SqlQuery {
    name: "QueryFilesTable",
    sql: "SELECT * FROM Files",
    params: &[],
    columns: FileEntry::column_names,
};

// ========== Scan Folders ==========

pub const SCAN_FOLDER_BY_ID: SqlQuery = SqlQuery {
    name: "QueryScanFolderByScanFolderID",
    sql: "SELECT * FROM ScanFolders WHERE ScanFolderID = :scanfolderid",
    params: &[SCAN_FOLDER_ID],
    columns: ScanFolderEntry::column_names,
};

pub const SCAN_FOLDER_BY_DISPLAY_NAME: SqlQuery = SqlQuery {
    name: "QueryScanFolderByDisplayName",
    sql: "SELECT * FROM ScanFolders WHERE DisplayName = :displayname",
    params: &[SqlParam::text(":displayname")],
    columns: ScanFolderEntry::column_names,
};

pub const SCAN_FOLDER_BY_PORTABLE_KEY: SqlQuery = SqlQuery {
    name: "QueryScanFolderByPortableKey",
    sql: "SELECT * FROM ScanFolders WHERE PortableKey = :portablekey",
    params: &[SqlParam::text(":portablekey")],
    columns: ScanFolderEntry::column_names,
};

pub const SCAN_FOLDER_BY_SOURCE_ID: SqlQuery = SqlQuery {
    name: "QueryScanFolderBySourceID",
    sql: "SELECT ScanFolders.* FROM ScanFolders \
          INNER JOIN Sources ON ScanFolders.ScanFolderID = Sources.ScanFolderPK \
          WHERE Sources.SourceID = :sourceid",
    params: &[SOURCE_ID],
    columns: ScanFolderEntry::column_names,
};

pub const SCAN_FOLDER_BY_JOB_ID: SqlQuery = SqlQuery {
    name: "QueryScanFolderByJobID",
    sql: "SELECT ScanFolders.* FROM ScanFolders \
          INNER JOIN Sources ON ScanFolders.ScanFolderID = Sources.ScanFolderPK \
          INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK \
          WHERE Jobs.JobID = :jobid",
    params: &[JOB_ID],
    columns: ScanFolderEntry::column_names,
};

pub const SCAN_FOLDER_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QueryScanFolderByProductID",
    sql: "SELECT ScanFolders.* FROM ScanFolders \
          INNER JOIN Sources ON ScanFolders.ScanFolderID = Sources.ScanFolderPK \
          INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK \
          INNER JOIN Products ON Jobs.JobID = Products.JobPK \
          WHERE Products.ProductID = :productid",
    params: &[PRODUCT_ID],
    columns: ScanFolderEntry::column_names,
};

// ========== Sources ==========

pub const SOURCE_BY_ID: SqlQuery = SqlQuery {
    name: "QuerySourceBySourceID",
    sql: "SELECT * FROM Sources WHERE SourceID = :sourceid",
    params: &[SOURCE_ID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_SCAN_FOLDER_ID: SqlQuery = SqlQuery {
    name: "QuerySourceByScanFolderID",
    sql: "SELECT * FROM Sources WHERE ScanFolderPK = :scanfolderid",
    params: &[SCAN_FOLDER_ID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_GUID: SqlQuery = SqlQuery {
    name: "QuerySourceBySourceGuid",
    sql: "SELECT * FROM Sources WHERE SourceGuid = :sourceguid",
    params: &[SOURCE_GUID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_NAME: SqlQuery = SqlQuery {
    name: "QuerySourceBySourceName",
    sql: "SELECT * FROM Sources WHERE SourceName = :sourcename",
    params: &[SOURCE_NAME],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_NAME_SCAN_FOLDER_ID: SqlQuery = SqlQuery {
    name: "QuerySourceBySourceNameScanFolderID",
    sql: "SELECT * FROM Sources WHERE SourceName = :sourcename AND ScanFolderPK = :scanfolderid",
    params: &[SOURCE_NAME, SCAN_FOLDER_ID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_LIKE_NAME: SqlQuery = SqlQuery {
    name: "QuerySourceLikeSourceName",
    sql: "SELECT * FROM Sources WHERE SourceName LIKE :sourcename ESCAPE '|'",
    params: &[SOURCE_NAME],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_JOB_ID: SqlQuery = SqlQuery {
    name: "QuerySourceByJobID",
    sql: "SELECT Sources.* FROM Sources \
          INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK \
          WHERE Jobs.JobID = :jobid",
    params: &[JOB_ID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QuerySourceByProductID",
    sql: "SELECT Sources.* FROM Sources \
          INNER JOIN Jobs ON Sources.SourceID = Jobs.SourcePK \
          INNER JOIN Products ON Jobs.JobID = Products.JobPK \
          WHERE Products.ProductID = :productid",
    params: &[PRODUCT_ID],
    columns: SourceEntry::column_names,
};

pub const SOURCE_ANALYSIS_FINGERPRINT: SqlQuery = SqlQuery {
    name: "QuerySourceAnalysisFingerprint",
    sql: "SELECT AnalysisFingerprint FROM Sources WHERE SourceName = :sourcename AND ScanFolderPK = :scanfolderid",
    params: &[SOURCE_NAME, SCAN_FOLDER_ID],
    columns: analysis_fingerprint_column,
};

pub const SOURCES_AND_SCAN_FOLDERS: SqlQuery = SqlQuery {
    name: "QuerySourcesAndScanFolders",
    sql: "SELECT * FROM Sources INNER JOIN ScanFolders ON Sources.ScanFolderPK = ScanFolders.ScanFolderID",
    params: &[],
    columns: SourceAndScanFolderEntry::column_names,
};

// ========== Jobs ==========

pub const JOB_BY_ID: SqlQuery = SqlQuery {
    name: "QueryJobByJobID",
    sql: "SELECT * FROM Jobs WHERE JobID = :jobid",
    params: &[JOB_ID],
    columns: JobEntry::column_names,
};

pub const JOB_BY_JOB_KEY: SqlQuery = SqlQuery {
    name: "QueryJobByJobKey",
    sql: "SELECT * FROM Jobs WHERE JobKey = :jobkey",
    params: &[SqlParam::text(":jobkey")],
    columns: JobEntry::column_names,
};

pub const JOB_BY_RUN_KEY: SqlQuery = SqlQuery {
    name: "QueryJobByJobRunKey",
    sql: "SELECT * FROM Jobs WHERE JobRunKey = :jobrunkey",
    params: &[SqlParam::integer(":jobrunkey")],
    columns: JobEntry::column_names,
};

pub const JOB_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QueryJobByProductID",
    sql: "SELECT Jobs.* FROM Jobs INNER JOIN Products ON Jobs.JobID = Products.JobPK WHERE Products.ProductID = :productid",
    params: &[PRODUCT_ID],
    columns: JobEntry::column_names,
};

pub const JOB_BY_SOURCE_ID: SqlQuery = SqlQuery {
    name: "QueryJobBySourceID",
    sql: "SELECT * FROM Jobs WHERE SourcePK = :sourceid",
    params: &[SOURCE_ID],
    columns: JobEntry::column_names,
};

pub const JOB_BY_SOURCE_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryJobBySourceIDPlatform",
    sql: "SELECT * FROM Jobs WHERE SourcePK = :sourceid AND Platform = :platform",
    params: &[SOURCE_ID, PLATFORM],
    columns: JobEntry::column_names,
};

// ========== Products ==========

pub const PRODUCT_BY_ID: SqlQuery = SqlQuery {
    name: "QueryProductByProductID",
    sql: products_sql!("WHERE Products.ProductID = :productid"),
    params: &[PRODUCT_ID],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_JOB_ID: SqlQuery = SqlQuery {
    name: "QueryProductByJobID",
    sql: products_sql!("WHERE Products.JobPK = :jobid"),
    params: &[JOB_ID],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_JOB_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductByJobIDPlatform",
    sql: products_sql!("WHERE Products.JobPK = :jobid AND Jobs.Platform = :platform"),
    params: &[JOB_ID, PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_SOURCE_ID: SqlQuery = SqlQuery {
    name: "QueryProductBySourceID",
    sql: products_sql!("WHERE Jobs.SourcePK = :sourceid"),
    params: &[SOURCE_ID],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_SOURCE_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductBySourceIDPlatform",
    sql: products_sql!("WHERE Jobs.SourcePK = :sourceid AND Jobs.Platform = :platform"),
    params: &[SOURCE_ID, PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_SOURCE_GUID_SUB_ID: SqlQuery = SqlQuery {
    name: "QueryProductBySourceGuidSubID",
    sql: products_by_source_sql!("WHERE Sources.SourceGuid = :sourceguid AND Products.SubID = :subid"),
    params: &[SOURCE_GUID, SUB_ID],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_JOB_ID_SUB_ID: SqlQuery = SqlQuery {
    name: "QueryProductByJobIDSubID",
    sql: products_sql!("WHERE Products.JobPK = :jobid AND Products.SubID = :subid"),
    params: &[JOB_ID, SUB_ID],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_NAME: SqlQuery = SqlQuery {
    name: "QueryProductByProductName",
    sql: products_sql!("WHERE Products.ProductName = :productname"),
    params: &[PRODUCT_NAME],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductByProductNamePlatform",
    sql: products_sql!("WHERE Products.ProductName = :productname AND Jobs.Platform = :platform"),
    params: &[PRODUCT_NAME, PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_LIKE_NAME: SqlQuery = SqlQuery {
    name: "QueryProductLikeProductName",
    sql: products_sql!("WHERE Products.ProductName LIKE :productname ESCAPE '|'"),
    params: &[PRODUCT_NAME],
    columns: product_and_job_columns,
};

pub const PRODUCT_LIKE_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductLikeProductNamePlatform",
    sql: products_sql!("WHERE Products.ProductName LIKE :productname ESCAPE '|' AND Jobs.Platform = :platform"),
    params: &[PRODUCT_NAME, PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_SOURCE_NAME: SqlQuery = SqlQuery {
    name: "QueryProductBySourceName",
    sql: products_by_source_sql!("WHERE Sources.SourceName = :sourcename"),
    params: &[SOURCE_NAME],
    columns: product_and_job_columns,
};

pub const PRODUCT_BY_SOURCE_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductBySourceNamePlatform",
    sql: products_by_source_sql!("WHERE Sources.SourceName = :sourcename AND Jobs.Platform = :platform"),
    params: &[SOURCE_NAME, PLATFORM],
    columns: product_and_job_columns,
};

pub const PRODUCT_LIKE_SOURCE_NAME: SqlQuery = SqlQuery {
    name: "QueryProductLikeSourceName",
    sql: products_by_source_sql!("WHERE Sources.SourceName LIKE :sourcename ESCAPE '|'"),
    params: &[SOURCE_NAME],
    columns: product_and_job_columns,
};

pub const PRODUCT_LIKE_SOURCE_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryProductLikeSourceNamePlatform",
    sql: products_by_source_sql!("WHERE Sources.SourceName LIKE :sourcename ESCAPE '|' AND Jobs.Platform = :platform"),
    params: &[SOURCE_NAME, PLATFORM],
    columns: product_and_job_columns,
};

pub const LEGACY_SUB_IDS_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QueryLegacySubIDsByProductID",
    sql: "SELECT * FROM LegacySubIDs WHERE ProductPK = :productid",
    params: &[PRODUCT_ID],
    columns: LegacySubIdEntry::column_names,
};

// ========== Combined ==========

pub const COMBINED: SqlQuery = SqlQuery {
    name: "QueryCombined",
    sql: combined_sql!(""),
    params: &[],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedByPlatform",
    sql: combined_sql!(" WHERE Jobs.Platform = :platform"),
    params: &[PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_SOURCE_ID: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceID",
    sql: combined_sql!(" WHERE Sources.SourceID = :sourceid"),
    params: &[SOURCE_ID],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_SOURCE_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceIDPlatform",
    sql: combined_sql!(" WHERE Sources.SourceID = :sourceid AND Jobs.Platform = :platform"),
    params: &[SOURCE_ID, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_JOB_ID: SqlQuery = SqlQuery {
    name: "QueryCombinedByJobID",
    sql: combined_sql!(" WHERE Jobs.JobID = :jobid"),
    params: &[JOB_ID],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_JOB_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedByJobIDPlatform",
    sql: combined_sql!(" WHERE Jobs.JobID = :jobid AND Jobs.Platform = :platform"),
    params: &[JOB_ID, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QueryCombinedByProductID",
    sql: combined_sql!(" WHERE Products.ProductID = :productid"),
    params: &[PRODUCT_ID],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_PRODUCT_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedByProductIDPlatform",
    sql: combined_sql!(" WHERE Products.ProductID = :productid AND Jobs.Platform = :platform"),
    params: &[PRODUCT_ID, PLATFORM],
    columns: CombinedEntry::column_names,
};

/// Also matches products that still answer to the GUID as a legacy alias.
pub const COMBINED_BY_SOURCE_GUID_SUB_ID: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceGuidProductSubID",
    sql: combined_sql!(
        " WHERE Products.SubID = :subid AND (Sources.SourceGuid = :sourceguid OR Products.LegacyGuid = :sourceguid)"
    ),
    params: &[SUB_ID, SOURCE_GUID],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_SOURCE_GUID_SUB_ID_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceGuidProductSubIDPlatform",
    sql: combined_sql!(
        " WHERE Products.SubID = :subid AND (Sources.SourceGuid = :sourceguid OR Products.LegacyGuid = :sourceguid) AND Jobs.Platform = :platform"
    ),
    params: &[SUB_ID, SOURCE_GUID, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_SOURCE_NAME: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceName",
    sql: combined_sql!(" WHERE Sources.SourceName = :sourcename"),
    params: &[SOURCE_NAME],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_SOURCE_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedBySourceNamePlatform",
    sql: combined_sql!(" WHERE Sources.SourceName = :sourcename AND Jobs.Platform = :platform"),
    params: &[SOURCE_NAME, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_LIKE_SOURCE_NAME: SqlQuery = SqlQuery {
    name: "QueryCombinedLikeSourceName",
    sql: combined_sql!(" WHERE Sources.SourceName LIKE :sourcename ESCAPE '|'"),
    params: &[SOURCE_NAME],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_LIKE_SOURCE_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedLikeSourceNamePlatform",
    sql: combined_sql!(" WHERE Sources.SourceName LIKE :sourcename ESCAPE '|' AND Jobs.Platform = :platform"),
    params: &[SOURCE_NAME, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_PRODUCT_NAME: SqlQuery = SqlQuery {
    name: "QueryCombinedByProductName",
    sql: combined_sql!(" WHERE Products.ProductName = :productname"),
    params: &[PRODUCT_NAME],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_BY_PRODUCT_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedByProductNamePlatform",
    sql: combined_sql!(" WHERE Products.ProductName = :productname AND Jobs.Platform = :platform"),
    params: &[PRODUCT_NAME, PLATFORM],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_LIKE_PRODUCT_NAME: SqlQuery = SqlQuery {
    name: "QueryCombinedLikeProductName",
    sql: combined_sql!(" WHERE Products.ProductName LIKE :productname ESCAPE '|'"),
    params: &[PRODUCT_NAME],
    columns: CombinedEntry::column_names,
};

pub const COMBINED_LIKE_PRODUCT_NAME_PLATFORM: SqlQuery = SqlQuery {
    name: "QueryCombinedLikeProductNamePlatform",
    sql: combined_sql!(" WHERE Products.ProductName LIKE :productname ESCAPE '|' AND Jobs.Platform = :platform"),
    params: &[PRODUCT_NAME, PLATFORM],
    columns: CombinedEntry::column_names,
};

// ========== Source Dependencies ==========

pub const SOURCE_DEPENDENCY_BY_ID: SqlQuery = SqlQuery {
    name: "QuerySourceDependencyBySourceDependencyID",
    sql: "SELECT * FROM SourceDependency WHERE SourceDependencyID = :sourcedependencyid",
    params: &[SqlParam::integer(":sourcedependencyid")],
    columns: SourceFileDependencyEntry::column_names,
};

/// Reverse lookup for exact dependency types.
pub const SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE: SqlQuery = SqlQuery {
    name: "QuerySourceDependencyByDependsOnSource",
    sql: "SELECT * FROM SourceDependency WHERE \
          DependsOnSource = :dependsonsource AND \
          TypeOfDependency & :typeofdependency AND \
          Source LIKE :dependentfilter",
    params: &[
        SqlParam::text(":dependsonsource"),
        SqlParam::mask(":typeofdependency"),
        SqlParam::text(":dependentfilter"),
    ],
    columns: SourceFileDependencyEntry::column_names,
};

/// Reverse lookup that also treats stored `DependsOnSource` patterns of
/// wildcard edges as LIKE patterns against the requested name.
pub const SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE_WILDCARD: SqlQuery = SqlQuery {
    name: "QuerySourceDependencyByDependsOnSourceWildcard",
    sql: "SELECT * FROM SourceDependency WHERE \
          ((TypeOfDependency & :typeofdependency AND DependsOnSource = :dependsonsource) OR \
          (TypeOfDependency = :wildcarddependency AND :dependsonsource LIKE DependsOnSource)) AND \
          Source LIKE :dependentfilter",
    params: &[
        SqlParam::text(":dependsonsource"),
        SqlParam::mask(":typeofdependency"),
        SqlParam::mask(":wildcarddependency"),
        SqlParam::text(":dependentfilter"),
    ],
    columns: SourceFileDependencyEntry::column_names,
};

pub const DEPENDS_ON_SOURCE_BY_SOURCE: SqlQuery = SqlQuery {
    name: "QueryDependsOnSourceBySource",
    sql: "SELECT * FROM SourceDependency WHERE \
          Source = :source AND \
          TypeOfDependency & :typeofdependency AND \
          DependsOnSource LIKE :dependencyfilter",
    params: &[
        SqlParam::text(":source"),
        SqlParam::mask(":typeofdependency"),
        SqlParam::text(":dependencyfilter"),
    ],
    columns: SourceFileDependencyEntry::column_names,
};

// ========== Product Dependencies ==========

pub const PRODUCT_DEPENDENCY_BY_ID: SqlQuery = SqlQuery {
    name: "QueryProductDependencyByProductDependencyID",
    sql: "SELECT * FROM ProductDependencies WHERE ProductDependencyID = :productdependencyid",
    params: &[SqlParam::integer(":productdependencyid")],
    columns: ProductDependencyEntry::column_names,
};

pub const PRODUCT_DEPENDENCY_BY_PRODUCT_ID: SqlQuery = SqlQuery {
    name: "QueryProductDependencyByProductID",
    sql: "SELECT * FROM ProductDependencies WHERE ProductPK = :productid",
    params: &[PRODUCT_ID],
    columns: ProductDependencyEntry::column_names,
};

/// Products whose (source GUID, sub id) is the target of an edge out of `:productid`.
pub const DIRECT_PRODUCT_DEPENDENCIES: SqlQuery = SqlQuery {
    name: "QueryDirectProductDependencies",
    sql: "SELECT Products.* FROM Products \
          INNER JOIN Jobs ON Jobs.JobID = Products.JobPK \
          INNER JOIN Sources ON Sources.SourceID = Jobs.SourcePK \
          INNER JOIN ProductDependencies \
            ON Sources.SourceGuid = ProductDependencies.DependencySourceGuid \
            AND Products.SubID = ProductDependencies.DependencySubID \
          WHERE ProductDependencies.ProductPK = :productid",
    params: &[PRODUCT_ID],
    columns: ProductEntry::column_names,
};

pub const UNRESOLVED_PRODUCT_DEPENDENCIES: SqlQuery = SqlQuery {
    name: "QueryUnresolvedProductDependencies",
    sql: "SELECT * FROM ProductDependencies WHERE UnresolvedPath != ''",
    params: &[],
    columns: ProductDependencyEntry::column_names,
};

// ========== Files ==========

pub const FILE_BY_ID: SqlQuery = SqlQuery {
    name: "QueryFileByFileID",
    sql: "SELECT * FROM Files WHERE FileID = :fileid",
    params: &[SqlParam::integer(":fileid")],
    columns: FileEntry::column_names,
};

pub const FILES_BY_SCAN_FOLDER_ID: SqlQuery = SqlQuery {
    name: "QueryFilesByScanFolderID",
    sql: "SELECT * FROM Files WHERE ScanFolderPK = :scanfolderid",
    params: &[SCAN_FOLDER_ID],
    columns: FileEntry::column_names,
};

pub const FILE_BY_NAME_SCAN_FOLDER_ID: SqlQuery = SqlQuery {
    name: "QueryFileByFileNameScanFolderID",
    sql: "SELECT * FROM Files WHERE ScanFolderPK = :scanfolderid AND FileName = :filename",
    params: &[SCAN_FOLDER_ID, FILE_NAME],
    columns: FileEntry::column_names,
};

pub const FILES_LIKE_NAME: SqlQuery = SqlQuery {
    name: "QueryFilesLikeFileName",
    sql: "SELECT * FROM Files WHERE FileName LIKE :filename ESCAPE '|'",
    params: &[FILE_NAME],
    columns: FileEntry::column_names,
};

/// Every statement prepared and checked when a connection opens.
pub const ALL: &[&SqlQuery] = &[
    &DATABASE_INFO_TABLE,
    &BUILDER_INFO_TABLE,
    &SCAN_FOLDERS_TABLE,
    &SOURCES_TABLE,
    &JOBS_TABLE,
    &JOBS_TABLE_PLATFORM,
    &PRODUCTS_TABLE,
    &PRODUCTS_TABLE_PLATFORM,
    &PRODUCT_DEPENDENCIES_TABLE,
    &FILES_TABLE,
    &SCAN_FOLDER_BY_ID,
    &SCAN_FOLDER_BY_DISPLAY_NAME,
    &SCAN_FOLDER_BY_PORTABLE_KEY,
    &SCAN_FOLDER_BY_SOURCE_ID,
    &SCAN_FOLDER_BY_JOB_ID,
    &SCAN_FOLDER_BY_PRODUCT_ID,
    &SOURCE_BY_ID,
    &SOURCE_BY_SCAN_FOLDER_ID,
    &SOURCE_BY_GUID,
    &SOURCE_BY_NAME,
    &SOURCE_BY_NAME_SCAN_FOLDER_ID,
    &SOURCE_LIKE_NAME,
    &SOURCE_BY_JOB_ID,
    &SOURCE_BY_PRODUCT_ID,
    &SOURCE_ANALYSIS_FINGERPRINT,
    &SOURCES_AND_SCAN_FOLDERS,
    &JOB_BY_ID,
    &JOB_BY_JOB_KEY,
    &JOB_BY_RUN_KEY,
    &JOB_BY_PRODUCT_ID,
    &JOB_BY_SOURCE_ID,
    &JOB_BY_SOURCE_ID_PLATFORM,
    &PRODUCT_BY_ID,
    &PRODUCT_BY_JOB_ID,
    &PRODUCT_BY_JOB_ID_PLATFORM,
    &PRODUCT_BY_SOURCE_ID,
    &PRODUCT_BY_SOURCE_ID_PLATFORM,
    &PRODUCT_BY_SOURCE_GUID_SUB_ID,
    &PRODUCT_BY_JOB_ID_SUB_ID,
    &PRODUCT_BY_NAME,
    &PRODUCT_BY_NAME_PLATFORM,
    &PRODUCT_LIKE_NAME,
    &PRODUCT_LIKE_NAME_PLATFORM,
    &PRODUCT_BY_SOURCE_NAME,
    &PRODUCT_BY_SOURCE_NAME_PLATFORM,
    &PRODUCT_LIKE_SOURCE_NAME,
    &PRODUCT_LIKE_SOURCE_NAME_PLATFORM,
    &LEGACY_SUB_IDS_BY_PRODUCT_ID,
    &COMBINED,
    &COMBINED_PLATFORM,
    &COMBINED_BY_SOURCE_ID,
    &COMBINED_BY_SOURCE_ID_PLATFORM,
    &COMBINED_BY_JOB_ID,
    &COMBINED_BY_JOB_ID_PLATFORM,
    &COMBINED_BY_PRODUCT_ID,
    &COMBINED_BY_PRODUCT_ID_PLATFORM,
    &COMBINED_BY_SOURCE_GUID_SUB_ID,
    &COMBINED_BY_SOURCE_GUID_SUB_ID_PLATFORM,
    &COMBINED_BY_SOURCE_NAME,
    &COMBINED_BY_SOURCE_NAME_PLATFORM,
    &COMBINED_LIKE_SOURCE_NAME,
    &COMBINED_LIKE_SOURCE_NAME_PLATFORM,
    &COMBINED_BY_PRODUCT_NAME,
    &COMBINED_BY_PRODUCT_NAME_PLATFORM,
    &COMBINED_LIKE_PRODUCT_NAME,
    &COMBINED_LIKE_PRODUCT_NAME_PLATFORM,
    &SOURCE_DEPENDENCY_BY_ID,
    &SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE,
    &SOURCE_DEPENDENCY_BY_DEPENDS_ON_SOURCE_WILDCARD,
    &DEPENDS_ON_SOURCE_BY_SOURCE,
    &PRODUCT_DEPENDENCY_BY_ID,
    &PRODUCT_DEPENDENCY_BY_PRODUCT_ID,
    &DIRECT_PRODUCT_DEPENDENCIES,
    &UNRESOLVED_PRODUCT_DEPENDENCIES,
    &FILE_BY_ID,
    &FILES_BY_SCAN_FOLDER_ID,
    &FILE_BY_NAME_SCAN_FOLDER_ID,
    &FILES_LIKE_NAME,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_query_names_are_unique() {
        let mut names = HashSet::new();
        for query in ALL {
            assert!(names.insert(query.name), "duplicate query name {}", query.name);
        }
    }

    #[test]
    fn test_declared_params_appear_in_sql() {
        for query in ALL {
            for param in query.params {
                assert!(
                    query.sql.contains(param.name),
                    "{} declares {} but never uses it",
                    query.name,
                    param.name
                );
            }
        }
    }

    #[test]
    fn test_platform_variants_take_platform_last() {
        for query in ALL.iter().filter(|q| q.name.ends_with("Platform")) {
            let last = query.params.last().expect("platform query without params");
            assert_eq!(last.name, ":platform", "{}", query.name);
        }
    }
}
