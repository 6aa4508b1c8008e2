use tabled::{settings::Style, Table, Tabled};

use crate::entry::{JobInfo, ProductEntry, SourceEntry};
use crate::storage::DbStats;

#[derive(Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Table")]
    pub metric: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

#[derive(Tabled)]
pub struct SourceRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Source")]
    pub name: String,
    #[tabled(rename = "GUID")]
    pub guid: String,
    #[tabled(rename = "Scan Folder")]
    pub scan_folder: i64,
}

impl From<&SourceEntry> for SourceRow {
    fn from(source: &SourceEntry) -> Self {
        Self {
            id: source.source_id,
            name: source.source_name.clone(),
            guid: source.source_guid.to_string(),
            scan_folder: source.scan_folder_pk,
        }
    }
}

#[derive(Tabled)]
pub struct ProductRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Job")]
    pub job: i64,
    #[tabled(rename = "Sub ID")]
    pub sub_id: u32,
    #[tabled(rename = "Product")]
    pub name: String,
}

impl From<&ProductEntry> for ProductRow {
    fn from(product: &ProductEntry) -> Self {
        Self {
            id: product.product_id,
            job: product.job_pk,
            sub_id: product.sub_id,
            name: product.product_name.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct JobRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[tabled(rename = "Job Key")]
    pub job_key: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Run Key")]
    pub run_key: u64,
}

impl From<&JobInfo> for JobRow {
    fn from(info: &JobInfo) -> Self {
        Self {
            id: info.job_id,
            source: info.source_file.clone(),
            platform: info.platform.clone(),
            job_key: info.job_key.clone(),
            status: info.status.to_string(),
            run_key: info.job_run_key,
        }
    }
}

/// Render rows as a rounded table, or nothing when there are none.
pub fn render<'a, T, R>(items: impl IntoIterator<Item = &'a T>) -> String
where
    T: 'a,
    R: Tabled + From<&'a T>,
{
    let rows: Vec<R> = items.into_iter().map(R::from).collect();
    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    let rows = [
        ("ScanFolders", stats.scan_folders),
        ("Sources", stats.sources),
        ("Jobs", stats.jobs),
        ("Products", stats.products),
        ("SourceDependency", stats.source_dependencies),
        ("ProductDependencies", stats.product_dependencies),
        ("  unresolved", stats.unresolved_dependencies),
        ("Files", stats.files),
    ]
    .into_iter()
    .map(|(metric, value)| MetricRow {
        metric: metric.to_string(),
        value: value.to_string(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_render_products() {
        let products = vec![ProductEntry::new(3, 1, "pc/rock.dds", Uuid::nil(), Uuid::nil()).with_id(9)];
        let table = render::<_, ProductRow>(&products);
        assert!(table.contains("pc/rock.dds"));
        assert!(table.contains("Sub ID"));

        let empty: Vec<ProductEntry> = Vec::new();
        assert!(render::<_, ProductRow>(&empty).is_empty());
    }

    #[test]
    fn test_stats_table_lists_tables() {
        let stats = DbStats { products: 42, ..Default::default() };
        let table = stats_table(&stats);
        assert!(table.contains("Products"));
        assert!(table.contains("42"));
    }
}
