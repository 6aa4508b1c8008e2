//! Write path: upserts, removals, transactions and table statistics.

use rusqlite::params_from_iter;
use rusqlite::types::Value;

use super::connection::AssetDatabase;
use super::schema;
use crate::entry::{Entry, LegacySubIdEntry, ProductDependencyEntry, ProductEntry};
use crate::Result;

impl AssetDatabase {
    /// Insert the entry when its id is `-1`, otherwise update the row with
    /// that id. Inserts assign the new id back to the entry.
    pub fn set_entry<T: Entry>(&self, entry: &mut T) -> Result<()> {
        entry.validate()?;
        let conn = self.writable()?;
        let columns = &T::COLUMNS[1..];

        if entry.id() == -1 {
            let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
            let placeholders = vec!["?"; names.len()].join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                T::TABLE,
                names.join(", "),
                placeholders
            );
            conn.prepare_cached(&sql)?.execute(params_from_iter(entry.values()))?;
            entry.set_id(conn.last_insert_rowid());
            tracing::trace!(table = T::TABLE, id = entry.id(), "inserted entry");
        } else {
            let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c.name)).collect();
            let sql = format!(
                "UPDATE {} SET {} WHERE {} = ?",
                T::TABLE,
                assignments.join(", "),
                T::primary_key()
            );
            let mut values = entry.values();
            values.push(Value::Integer(entry.id()));
            conn.prepare_cached(&sql)?.execute(params_from_iter(values))?;
            tracing::trace!(table = T::TABLE, id = entry.id(), "updated entry");
        }
        Ok(())
    }

    /// Delete the row with the given id. Returns whether a row was removed.
    pub fn remove_entry<T: Entry>(&self, id: i64) -> Result<bool> {
        let conn = self.writable()?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1", T::TABLE, T::primary_key());
        let removed = conn.prepare_cached(&sql)?.execute([id])?;
        Ok(removed > 0)
    }

    /// Delete every product of a job, along with their outgoing dependency
    /// edges and legacy sub ids.
    pub fn remove_products_by_job(&self, job_id: i64) -> Result<usize> {
        self.remove_where::<ProductEntry>("JobPK", job_id)
    }

    pub fn remove_product_dependencies_by_product(&self, product_id: i64) -> Result<usize> {
        self.remove_where::<ProductDependencyEntry>("ProductPK", product_id)
    }

    pub fn remove_legacy_sub_ids_by_product(&self, product_id: i64) -> Result<usize> {
        self.remove_where::<LegacySubIdEntry>("ProductPK", product_id)
    }

    fn remove_where<T: Entry>(&self, column: &str, value: i64) -> Result<usize> {
        let conn = self.writable()?;
        let sql = format!("DELETE FROM {} WHERE {} = ?1", T::TABLE, column);
        Ok(conn.prepare_cached(&sql)?.execute([value])?)
    }

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&self) -> Result<()> {
        self.writable()?.execute_batch("BEGIN TRANSACTION")?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&self) -> Result<()> {
        self.writable()?.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&self) -> Result<()> {
        self.writable()?.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let unresolved = self.conn()?.query_row(
            "SELECT COUNT(*) FROM ProductDependencies WHERE UnresolvedPath != ''",
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(DbStats {
            version: self.schema_version()?,
            scan_folders: self.count("ScanFolders")?,
            sources: self.count("Sources")?,
            jobs: self.count("Jobs")?,
            products: self.count("Products")?,
            source_dependencies: self.count("SourceDependency")?,
            product_dependencies: self.count("ProductDependencies")?,
            unresolved_dependencies: unresolved as usize,
            files: self.count("Files")?,
        })
    }

    fn count(&self, table: &'static str) -> Result<usize> {
        debug_assert!(schema::EXPECTED_TABLES.contains(&table));
        let count: i64 = self
            .conn()?
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Database statistics
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DbStats {
    pub version: i64,
    pub scan_folders: usize,
    pub sources: usize,
    pub jobs: usize,
    pub products: usize,
    pub source_dependencies: usize,
    pub product_dependencies: usize,
    pub unresolved_dependencies: usize,
    pub files: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics (schema v{}):", self.version)?;
        writeln!(f, "  Scan folders: {}", self.scan_folders)?;
        writeln!(f, "  Sources: {}", self.sources)?;
        writeln!(f, "  Jobs: {}", self.jobs)?;
        writeln!(f, "  Products: {}", self.products)?;
        writeln!(f, "  Source dependencies: {}", self.source_dependencies)?;
        writeln!(
            f,
            "  Product dependencies: {} ({} unresolved)",
            self.product_dependencies, self.unresolved_dependencies
        )?;
        writeln!(f, "  Files: {}", self.files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{JobEntry, JobStatus, ScanFolderEntry, SourceEntry};
    use crate::query::catalog;
    use crate::Error;
    use uuid::Uuid;

    fn seed(db: &AssetDatabase) -> (ScanFolderEntry, SourceEntry, JobEntry) {
        let mut folder = ScanFolderEntry::new("/game/assets", "Assets", "assets", "", true);
        db.set_entry(&mut folder).unwrap();
        let mut source = SourceEntry::new(folder.scan_folder_id, "textures/rock.png", Uuid::new_v4(), "fp1");
        db.set_entry(&mut source).unwrap();
        let mut job = JobEntry::new(source.source_id, "Compile Texture", 11, "pc", Uuid::new_v4(), JobStatus::Completed, 100);
        db.set_entry(&mut job).unwrap();
        (folder, source, job)
    }

    #[test]
    fn test_insert_assigns_id_and_reads_back() {
        let db = AssetDatabase::open_in_memory().unwrap();
        let (folder, source, job) = seed(&db);
        assert_ne!(folder.scan_folder_id, -1);
        assert_ne!(source.source_id, -1);
        assert_ne!(job.job_id, -1);

        let stored = db
            .first(
                &catalog::SOURCE_BY_ID,
                &[catalog::SqlValue::Integer(source.source_id)],
                SourceEntry::from_row,
            )
            .unwrap()
            .unwrap();
        assert_eq!(stored, source);
        assert_eq!(stored.source_id, source.source_id);
    }

    #[test]
    fn test_update_existing_row() {
        let db = AssetDatabase::open_in_memory().unwrap();
        let (_, mut source, _) = seed(&db);
        let id = source.source_id;

        source.analysis_fingerprint = "fp2".to_string();
        db.set_entry(&mut source).unwrap();
        assert_eq!(source.source_id, id);

        let stored = db
            .first(&catalog::SOURCE_BY_ID, &[catalog::SqlValue::Integer(id)], SourceEntry::from_row)
            .unwrap()
            .unwrap();
        assert_eq!(stored.analysis_fingerprint, "fp2");
        assert_eq!(db.stats().unwrap().sources, 1);
    }

    #[test]
    fn test_invalid_entry_is_rejected() {
        let db = AssetDatabase::open_in_memory().unwrap();
        let (_, source, _) = seed(&db);
        let mut job = JobEntry::new(source.source_id, "Compile", 1, "pc", Uuid::new_v4(), JobStatus::Any, 1);
        assert!(matches!(db.set_entry(&mut job), Err(Error::InvalidEntry(_))));
        assert_eq!(job.job_id, -1);
    }

    #[test]
    fn test_remove_products_cascades_edges() {
        let db = AssetDatabase::open_in_memory().unwrap();
        let (_, source, job) = seed(&db);

        let mut product = ProductEntry::new(job.job_id, 0, "pc/textures/rock.dds", Uuid::new_v4(), Uuid::nil());
        db.set_entry(&mut product).unwrap();
        let mut edge = ProductDependencyEntry::new(
            product.product_id,
            source.source_guid,
            1,
            crate::entry::DependencyFlags::default(),
            "pc",
        );
        db.set_entry(&mut edge).unwrap();
        let mut legacy = LegacySubIdEntry::new(product.product_id, 7);
        db.set_entry(&mut legacy).unwrap();

        assert_eq!(db.remove_products_by_job(job.job_id).unwrap(), 1);
        let stats = db.stats().unwrap();
        assert_eq!(stats.products, 0);
        assert_eq!(stats.product_dependencies, 0);
        assert!(!db.remove_entry::<ProductEntry>(product.product_id).unwrap());
    }

    #[test]
    fn test_rollback_discards_writes() {
        let db = AssetDatabase::open_in_memory().unwrap();
        db.begin_transaction().unwrap();
        seed(&db);
        db.rollback().unwrap();
        assert_eq!(db.stats().unwrap().scan_folders, 0);

        db.begin_transaction().unwrap();
        seed(&db);
        db.commit().unwrap();
        assert_eq!(db.stats().unwrap().scan_folders, 1);
    }
}
