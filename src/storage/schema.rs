//! Database schema definitions

/// Schema version written by this build. Stores carrying any other version
/// refuse to open.
pub const CURRENT_VERSION: i64 = 22;

/// Version reported for a store that has no `dbinfo` row yet.
pub const DATABASE_DOES_NOT_EXIST: i64 = -1;

/// Tables every valid store must contain.
pub const EXPECTED_TABLES: &[&str] = &[
    "BuilderInfo",
    "Files",
    "Jobs",
    "LegacySubIDs",
    "ProductDependencies",
    "Products",
    "ScanFolders",
    "SourceDependency",
    "Sources",
    "dbinfo",
];

/// SQL to create the dbinfo table
pub const CREATE_DATABASE_INFO_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS dbinfo (
    rowID INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
)
"#;

/// SQL to create the BuilderInfo table
pub const CREATE_BUILDER_INFO_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS BuilderInfo (
    BuilderID INTEGER PRIMARY KEY AUTOINCREMENT,
    Guid BLOB NOT NULL,
    AnalysisFingerprint TEXT NOT NULL DEFAULT ''
)
"#;

/// SQL to create the ScanFolders table
pub const CREATE_SCAN_FOLDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ScanFolders (
    ScanFolderID INTEGER PRIMARY KEY AUTOINCREMENT,
    ScanFolder TEXT NOT NULL,
    DisplayName TEXT NOT NULL DEFAULT '',
    PortableKey TEXT NOT NULL UNIQUE,
    OutputPrefix TEXT NOT NULL DEFAULT '',
    IsRoot INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the Sources table
pub const CREATE_SOURCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Sources (
    SourceID INTEGER PRIMARY KEY AUTOINCREMENT,
    ScanFolderPK INTEGER NOT NULL,
    SourceName TEXT NOT NULL,
    SourceGuid BLOB NOT NULL,
    AnalysisFingerprint TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (ScanFolderPK) REFERENCES ScanFolders(ScanFolderID) ON DELETE CASCADE
)
"#;

/// SQL to create the Jobs table
pub const CREATE_JOBS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Jobs (
    JobID INTEGER PRIMARY KEY AUTOINCREMENT,
    SourcePK INTEGER NOT NULL,
    JobKey TEXT NOT NULL,
    Fingerprint INTEGER NOT NULL,
    Platform TEXT NOT NULL,
    BuilderGuid BLOB NOT NULL,
    Status INTEGER NOT NULL,
    JobRunKey INTEGER NOT NULL,
    FirstFailLogTime INTEGER NOT NULL DEFAULT 0,
    FirstFailLogFile TEXT NOT NULL DEFAULT '',
    LastFailLogTime INTEGER NOT NULL DEFAULT 0,
    LastFailLogFile TEXT NOT NULL DEFAULT '',
    LastLogTime INTEGER NOT NULL DEFAULT 0,
    LastLogFile TEXT NOT NULL DEFAULT '',
    FOREIGN KEY (SourcePK) REFERENCES Sources(SourceID) ON DELETE CASCADE
)
"#;

/// SQL to create the Products table
pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Products (
    ProductID INTEGER PRIMARY KEY AUTOINCREMENT,
    JobPK INTEGER NOT NULL,
    ProductName TEXT NOT NULL,
    SubID INTEGER NOT NULL,
    AssetType BLOB NOT NULL,
    LegacyGuid BLOB NOT NULL,
    UNIQUE(JobPK, SubID),
    FOREIGN KEY (JobPK) REFERENCES Jobs(JobID) ON DELETE CASCADE
)
"#;

/// SQL to create the LegacySubIDs table
pub const CREATE_LEGACY_SUB_IDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS LegacySubIDs (
    LegacySubID INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductPK INTEGER NOT NULL,
    SubID INTEGER NOT NULL,
    FOREIGN KEY (ProductPK) REFERENCES Products(ProductID) ON DELETE CASCADE
)
"#;

/// SQL to create the SourceDependency table
pub const CREATE_SOURCE_DEPENDENCY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS SourceDependency (
    SourceDependencyID INTEGER PRIMARY KEY AUTOINCREMENT,
    BuilderGuid BLOB NOT NULL,
    Source TEXT NOT NULL,
    DependsOnSource TEXT NOT NULL,
    TypeOfDependency INTEGER NOT NULL DEFAULT 1
)
"#;

/// SQL to create the ProductDependencies table
/// Edges point at (source GUID, sub id) so they survive product row churn
pub const CREATE_PRODUCT_DEPENDENCIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ProductDependencies (
    ProductDependencyID INTEGER PRIMARY KEY AUTOINCREMENT,
    ProductPK INTEGER NOT NULL,
    DependencySourceGuid BLOB NOT NULL,
    DependencySubID INTEGER NOT NULL,
    DependencyFlags INTEGER NOT NULL DEFAULT 0,
    Platform TEXT NOT NULL DEFAULT '',
    UnresolvedPath TEXT NOT NULL DEFAULT '',
    UnresolvedDependencyType INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (ProductPK) REFERENCES Products(ProductID) ON DELETE CASCADE
)
"#;

/// SQL to create the Files table
pub const CREATE_FILES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Files (
    FileID INTEGER PRIMARY KEY AUTOINCREMENT,
    ScanFolderPK INTEGER NOT NULL,
    FileName TEXT NOT NULL,
    IsFolder INTEGER NOT NULL DEFAULT 0,
    ModTime INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (ScanFolderPK) REFERENCES ScanFolders(ScanFolderID) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sources_scanfolder ON Sources(ScanFolderPK)",
    "CREATE INDEX IF NOT EXISTS idx_sources_name ON Sources(SourceName)",
    "CREATE INDEX IF NOT EXISTS idx_sources_guid ON Sources(SourceGuid)",
    "CREATE INDEX IF NOT EXISTS idx_jobs_source ON Jobs(SourcePK)",
    "CREATE INDEX IF NOT EXISTS idx_jobs_runkey ON Jobs(JobRunKey)",
    "CREATE INDEX IF NOT EXISTS idx_jobs_key ON Jobs(JobKey)",
    "CREATE INDEX IF NOT EXISTS idx_products_job ON Products(JobPK)",
    "CREATE INDEX IF NOT EXISTS idx_products_name ON Products(ProductName)",
    "CREATE INDEX IF NOT EXISTS idx_legacy_product ON LegacySubIDs(ProductPK)",
    "CREATE INDEX IF NOT EXISTS idx_sourcedep_source ON SourceDependency(Source)",
    "CREATE INDEX IF NOT EXISTS idx_sourcedep_dependson ON SourceDependency(DependsOnSource)",
    "CREATE INDEX IF NOT EXISTS idx_productdep_product ON ProductDependencies(ProductPK)",
    "CREATE INDEX IF NOT EXISTS idx_productdep_target ON ProductDependencies(DependencySourceGuid, DependencySubID)",
    "CREATE INDEX IF NOT EXISTS idx_files_scanfolder_name ON Files(ScanFolderPK, FileName)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_DATABASE_INFO_TABLE,
        CREATE_BUILDER_INFO_TABLE,
        CREATE_SCAN_FOLDERS_TABLE,
        CREATE_SOURCES_TABLE,
        CREATE_JOBS_TABLE,
        CREATE_PRODUCTS_TABLE,
        CREATE_LEGACY_SUB_IDS_TABLE,
        CREATE_SOURCE_DEPENDENCY_TABLE,
        CREATE_PRODUCT_DEPENDENCIES_TABLE,
        CREATE_FILES_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_expected_table_is_created() {
        let statements = all_schema_statements().join("\n");
        for table in EXPECTED_TABLES {
            assert!(
                statements.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "no CREATE statement for {}",
                table
            );
        }
    }
}
