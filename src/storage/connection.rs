//! Connection management for the asset database.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};

use super::schema;
use crate::config::{self, DatabaseLocation};
use crate::query::catalog::{self, SqlQuery, SqlValue};
use crate::{Error, Result};

/// A single connection to an asset database file.
///
/// The connection is opened explicitly and stays open until [`close`] is
/// called or the value is dropped. Opening validates the stored schema and
/// prepares every statement in the query catalog.
///
/// [`close`]: AssetDatabase::close
pub struct AssetDatabase {
    path: PathBuf,
    conn: Option<Connection>,
    read_only: bool,
    validated_tables: RefCell<HashSet<String>>,
}

impl AssetDatabase {
    /// Create a closed handle for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
            read_only: false,
            validated_tables: RefCell::new(HashSet::new()),
        }
    }

    /// Create a closed handle at the location the provider reports.
    pub fn from_location(location: &dyn DatabaseLocation) -> Self {
        Self::new(config::resolve_database_path(Some(location)))
    }

    /// Create and open a handle in one step.
    pub fn open_path(path: impl Into<PathBuf>, read_only: bool) -> Result<Self> {
        let mut db = Self::new(path);
        db.open(read_only)?;
        Ok(db)
    }

    /// Open a fresh in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut db = Self::new(":memory:");
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        db.conn = Some(conn);
        let result = db.create_schema_if_missing().and_then(|()| db.validate());
        if let Err(e) = result {
            db.close();
            return Err(e);
        }
        Ok(db)
    }

    /// Open (or reopen) the connection.
    ///
    /// A read-write open creates the file and its schema when missing. A
    /// read-only open requires the file to exist. Any failure leaves the
    /// handle closed.
    pub fn open(&mut self, read_only: bool) -> Result<()> {
        self.close();

        match self.try_open(read_only) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), read_only, "opened asset database");
                Ok(())
            }
            Err(e) => {
                match &e {
                    Error::IncompatibleSchema { .. } | Error::CorruptSchema(_) => {
                        tracing::error!(path = %self.path.display(), "refusing to open asset database: {}", e)
                    }
                    _ => tracing::warn!(path = %self.path.display(), "failed to open asset database: {}", e),
                }
                self.close();
                Err(e)
            }
        }
    }

    fn try_open(&mut self, read_only: bool) -> Result<()> {
        let exists = self.path.exists();

        let conn = if read_only {
            if !exists {
                return Err(Error::NotFound(self.path.clone()));
            }
            Connection::open_with_flags(
                &self.path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?
        } else {
            if exists && fs::metadata(&self.path)?.permissions().readonly() {
                return Err(Error::PermissionDenied(self.path.clone()));
            }
            config::ensure_db_dir(&self.path)?;
            let conn = Connection::open(&self.path)?;
            conn.pragma_update(None, "foreign_keys", true)?;
            conn
        };

        self.conn = Some(conn);
        self.read_only = read_only;

        if !read_only {
            self.create_schema_if_missing()?;
        }
        self.validate()
    }

    /// Close the connection. Safe to call on a closed handle.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                tracing::warn!(path = %self.path.display(), "error closing asset database: {}", e);
            }
        }
        self.validated_tables.borrow_mut().clear();
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The open connection, or `NotOpen`.
    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    /// The open connection if it accepts writes.
    pub(crate) fn writable(&self) -> Result<&Connection> {
        let conn = self.conn()?;
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        Ok(conn)
    }

    // ========== Schema ==========

    fn create_schema_if_missing(&self) -> Result<()> {
        if self.table_exists("dbinfo")? {
            return Ok(());
        }

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(stmt, [])?;
        }
        tx.execute(
            "INSERT INTO dbinfo (rowID, version) VALUES (1, ?1)",
            [schema::CURRENT_VERSION],
        )?;
        tx.commit()?;

        tracing::info!(path = %self.path.display(), version = schema::CURRENT_VERSION, "created asset database schema");
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let found = self.schema_version()?;
        if found != schema::CURRENT_VERSION {
            return Err(Error::IncompatibleSchema {
                found,
                expected: schema::CURRENT_VERSION,
            });
        }

        for table in schema::EXPECTED_TABLES {
            if !self.validate_table_exists(table)? {
                return Err(Error::CorruptSchema((*table).to_string()));
            }
        }

        self.register_catalog()
    }

    /// Stored schema version, or [`schema::DATABASE_DOES_NOT_EXIST`] when the
    /// store has no version row.
    pub fn schema_version(&self) -> Result<i64> {
        if !self.table_exists("dbinfo")? {
            return Ok(schema::DATABASE_DOES_NOT_EXIST);
        }
        let version = self
            .conn()?
            .query_row("SELECT version FROM dbinfo ORDER BY rowID LIMIT 1", [], |row| row.get(0))
            .optional()?;
        Ok(version.unwrap_or(schema::DATABASE_DOES_NOT_EXIST))
    }

    /// Check that a table exists. Positive answers are cached until the
    /// connection closes.
    pub fn validate_table_exists(&self, table: &str) -> Result<bool> {
        if self.validated_tables.borrow().contains(table) {
            return Ok(true);
        }
        let exists = self.table_exists(table)?;
        if exists {
            self.validated_tables.borrow_mut().insert(table.to_string());
        }
        Ok(exists)
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Prepare every catalog statement and check it against its declaration.
    fn register_catalog(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.set_prepared_statement_cache_capacity(catalog::ALL.len() + 16);

        for query in catalog::ALL {
            let stmt = conn
                .prepare_cached(query.sql)
                .map_err(|source| Error::QueryExecution { query: query.name, source })?;

            let actual = stmt.parameter_count();
            let named = query
                .params
                .iter()
                .filter(|p| matches!(stmt.parameter_index(p.name), Ok(Some(_))))
                .count();
            if actual != query.params.len() || named != query.params.len() {
                return Err(Error::AttributeMismatch {
                    query: query.name,
                    expected: query.params.len(),
                    actual,
                });
            }

            let provided: HashSet<String> =
                stmt.column_names().iter().map(|c| c.to_ascii_lowercase()).collect();
            if let Some(missing) = (query.columns)()
                .into_iter()
                .find(|c| !provided.contains(&c.to_ascii_lowercase()))
            {
                return Err(Error::CorruptSchema(format!("{} (column of {})", missing, query.name)));
            }
        }

        tracing::debug!(count = catalog::ALL.len(), "registered query catalog");
        Ok(())
    }

    // ========== Query Execution ==========

    /// Run a catalog statement and hand each mapped row to `handler` until it
    /// returns `false`. Finding no rows is not an error.
    pub(crate) fn run<T, M, H>(
        &self,
        query: &'static SqlQuery,
        args: &[SqlValue<'_>],
        mut map: M,
        mut handler: H,
    ) -> Result<()>
    where
        M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
        H: FnMut(T) -> bool,
    {
        let conn = self.conn()?;
        if args.len() != query.params.len() {
            return Err(Error::AttributeMismatch {
                query: query.name,
                expected: query.params.len(),
                actual: args.len(),
            });
        }

        let fail = |source: rusqlite::Error| {
            tracing::error!(query = query.name, "query failed: {}", source);
            Error::QueryExecution { query: query.name, source }
        };

        let mut stmt = conn.prepare_cached(query.sql).map_err(fail)?;
        for (param, arg) in query.params.iter().zip(args) {
            if param.kind != arg.kind() {
                return Err(Error::InvalidValue(format!(
                    "{} expects {:?} for {}, got {:?}",
                    query.name,
                    param.kind,
                    param.name,
                    arg.kind()
                )));
            }
            let index = stmt
                .parameter_index(param.name)
                .map_err(fail)?
                .ok_or(Error::AttributeMismatch {
                    query: query.name,
                    expected: query.params.len(),
                    actual: stmt.parameter_count(),
                })?;
            stmt.raw_bind_parameter(index, arg).map_err(fail)?;
        }

        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next().map_err(fail)? {
            let item = map(row).map_err(fail)?;
            if !handler(item) {
                break;
            }
        }
        Ok(())
    }

    /// First mapped row of a catalog statement, if any.
    pub(crate) fn first<T, M>(&self, query: &'static SqlQuery, args: &[SqlValue<'_>], map: M) -> Result<Option<T>>
    where
        M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut found = None;
        self.run(query, args, map, |item| {
            found = Some(item);
            false
        })?;
        Ok(found)
    }

    /// Every mapped row of a catalog statement.
    pub(crate) fn collect<T, M>(&self, query: &'static SqlQuery, args: &[SqlValue<'_>], map: M) -> Result<Vec<T>>
    where
        M: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut items = Vec::new();
        self.run(query, args, map, |item| {
            items.push(item);
            true
        })?;
        Ok(items)
    }
}

impl Drop for AssetDatabase {
    fn drop(&mut self) {
        self.close();
    }
}
