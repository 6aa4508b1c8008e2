//! assetdb CLI - inspect and maintain an asset pipeline database

use anyhow::Context;
use assetdb::config::{self, AssetDbConfig, DatabaseLocation};
use assetdb::dependency::Resolver;
use assetdb::ui::{self, Icons, JobRow, ProductRow, SourceRow};
use assetdb::{AssetDatabase, CombinedEntry, JobFilter, JobInfo, JobStatus, LikeType, ProductEntry, SourceEntry};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "assetdb")]
#[command(version = "0.1.0")]
#[command(about = "Asset dependency database - sources, jobs, products and the edges between them")]
#[command(long_about = r#"
assetdb reads and maintains the database behind an incremental asset pipeline:
  • Which sources exist and where they were scanned from
  • Which jobs ran for each platform, and how they ended
  • Which products each job emitted
  • What every product depends on, directly or transitively

Example usage:
  assetdb init --write-config
  assetdb products --name "textures/%" --like raw --platform pc
  assetdb deps 42 --all
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and its schema if missing
    Init {
        /// Also write a config file pointing at the database
        #[arg(long)]
        write_config: bool,

        /// Default platform recorded in the config file
        #[arg(long)]
        platform: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show row counts per table
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sources
    Sources {
        /// Source name or pattern
        #[arg(short, long)]
        name: Option<String>,

        /// Match the name as a pattern: starts-with, ends-with, matches, raw
        #[arg(long)]
        like: Option<LikeType>,

        /// Restrict to one scan folder
        #[arg(long)]
        scan_folder: Option<i64>,
    },

    /// List products
    Products {
        /// Product name or pattern
        #[arg(short, long)]
        name: Option<String>,

        /// How the name is matched
        #[arg(long)]
        like: Option<LikeType>,

        /// Match the name against source names instead of product names
        #[arg(long)]
        by_source: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show jobs with their source and log locations
    Jobs {
        /// Source name whose jobs to show
        #[arg(short, long)]
        source: Option<String>,

        /// Job run key
        #[arg(long)]
        run_key: Option<u64>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the full chain for a logical asset id
    Asset {
        /// Source GUID (or legacy GUID)
        guid: Uuid,

        /// Product sub id
        #[arg(default_value_t = 0)]
        sub_id: u32,

        /// Attach legacy sub ids
        #[arg(long)]
        legacy: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show the dependencies of a product
    Deps {
        /// Product row id
        product: i64,

        /// Follow dependencies transitively
        #[arg(long)]
        all: bool,
    },

    /// List product dependencies still recorded by path
    Unresolved,

    /// Bind path-only product dependencies to the products that now exist
    Resolve,
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Restrict to one platform
    #[arg(short, long)]
    platform: Option<String>,

    /// Restrict to one job key
    #[arg(long)]
    job_key: Option<String>,

    /// Restrict to one job status
    #[arg(long, default_value = "any")]
    status: JobStatus,

    /// Restrict to one builder
    #[arg(long)]
    builder: Option<Uuid>,
}

impl FilterArgs {
    fn to_filter(&self, config: Option<&AssetDbConfig>) -> JobFilter {
        let mut filter = JobFilter::new().status(self.status);
        if let Some(platform) = self
            .platform
            .as_deref()
            .or_else(|| config.and_then(|c| c.platform.as_deref()))
        {
            filter = filter.platform(platform);
        }
        if let Some(key) = &self.job_key {
            filter = filter.job_key(key.as_str());
        }
        if let Some(guid) = self.builder {
            filter = filter.builder(guid);
        }
        filter
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?;
    let location: Option<&dyn DatabaseLocation> = match (&cli.database, &config) {
        (Some(path), _) => Some(path),
        (None, Some(config)) => Some(config),
        (None, None) => None,
    };
    let database = config::resolve_database_path(location);

    match cli.command {
        Commands::Init { write_config, platform, force } => {
            let db = AssetDatabase::open_path(&database, false)
                .with_context(|| format!("failed to create {}", database.display()))?;
            ui::header(Icons::DATABASE, "Asset database ready");
            ui::info("Path", &database.display().to_string());
            ui::info("Schema version", &db.schema_version()?.to_string());

            if write_config {
                let path = cli.config.unwrap_or_else(config::default_config_path);
                let config = AssetDbConfig {
                    database: Some(database.display().to_string()),
                    platform,
                };
                config::write_config(&path, &config, force)?;
                ui::success(&format!("Config written to {}", path.display()));
            }
        }

        Commands::Stats { json } => {
            let db = open_read_only(&database)?;
            let stats = db.stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                ui::header(Icons::STATS, &format!("Database Statistics (schema v{})", stats.version));
                println!("{}", ui::stats_table(&stats));
            }
        }

        Commands::Sources { name, like, scan_folder } => {
            let db = open_read_only(&database)?;
            let mut sources: Vec<SourceEntry> = Vec::new();
            let collect = |source| {
                sources.push(source);
                true
            };
            match (name.as_deref(), like) {
                (Some(name), Some(like)) => db.query_sources_like_name(name, like, collect)?,
                (Some(name), None) => db.query_sources_by_name(name, scan_folder, collect)?,
                (None, _) => match scan_folder {
                    Some(id) => db.query_sources_by_scan_folder_id(id, collect)?,
                    None => db.query_sources_table(collect)?,
                },
            }

            ui::header(Icons::SOURCE, &format!("{} sources", sources.len()));
            print_table::<_, SourceRow>(&sources);
        }

        Commands::Products { name, like, by_source, filter } => {
            let db = open_read_only(&database)?;
            let filter = filter.to_filter(config.as_ref());
            let mut products: Vec<ProductEntry> = Vec::new();
            let collect = |product| {
                products.push(product);
                true
            };
            match (name.as_deref(), like, by_source) {
                (Some(name), Some(like), false) => db.query_products_like_name(name, like, &filter, collect)?,
                (Some(name), None, false) => db.query_products_by_name(name, &filter, collect)?,
                (Some(name), Some(like), true) => db.query_products_like_source_name(name, like, &filter, collect)?,
                (Some(name), None, true) => db.query_products_by_source_name(name, &filter, collect)?,
                (None, _, _) => db.query_products_table(&filter, collect)?,
            }

            ui::header(Icons::PRODUCT, &format!("{} products", products.len()));
            print_table::<_, ProductRow>(&products);
        }

        Commands::Jobs { source, run_key, filter, json } => {
            let db = open_read_only(&database)?;
            let filter = filter.to_filter(config.as_ref());
            let mut jobs: Vec<JobInfo> = Vec::new();
            match (source.as_deref(), run_key) {
                (_, Some(run_key)) => db.query_job_info_by_run_key(run_key, |info| {
                    jobs.push(info);
                    true
                })?,
                (Some(source), None) => db.query_job_info_by_source_name(source, &filter, |info| {
                    jobs.push(info);
                    true
                })?,
                (None, None) => {
                    let mut entries = Vec::new();
                    db.query_jobs_table(&filter, |job| {
                        entries.push(job);
                        true
                    })?;
                    for job in entries {
                        jobs.push(db.job_info(job)?);
                    }
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
                return Ok(());
            }

            ui::header(Icons::JOB, &format!("{} jobs", jobs.len()));
            print_table::<_, JobRow>(&jobs);
            for info in jobs.iter().filter(|info| info.status.is_failure()) {
                ui::warn(&format!(
                    "{} [{}] {}: {}",
                    info.source_file,
                    info.platform,
                    ui::job_status(info.status),
                    info.last_fail_log_file
                ));
            }
        }

        Commands::Asset { guid, sub_id, legacy, filter } => {
            let db = open_read_only(&database)?;
            let filter = filter.to_filter(config.as_ref());
            let mut entries: Vec<CombinedEntry> = Vec::new();
            db.query_combined_by_source_guid_sub_id(guid, sub_id, &filter, legacy, |entry| {
                entries.push(entry);
                true
            })?;

            if entries.is_empty() {
                ui::warn(&format!("No products for {{{}}}:{:x}", guid, sub_id));
                return Ok(());
            }

            ui::header(Icons::SEARCH, &format!("{} matches", entries.len()));
            for entry in &entries {
                ui::section(&entry.product.product_name);
                println!("{}", entry);
            }
        }

        Commands::Deps { product, all } => {
            let db = open_read_only(&database)?;
            let mut direct = Vec::new();
            db.query_direct_product_dependencies(product, |p| {
                direct.push(p.product_id);
                true
            })?;

            let mut found = 0usize;
            let mut print = |p: ProductEntry| {
                let is_direct = direct.contains(&p.product_id);
                ui::dependency(is_direct, &p.product_name, &format!("#{} sub {}", p.product_id, p.sub_id));
                found += 1;
                true
            };

            ui::header(Icons::LINK, &format!("Dependencies of product #{}", product));
            if all {
                db.query_all_product_dependencies(product, &mut print)?;
            } else {
                db.query_direct_product_dependencies(product, &mut print)?;
            }

            if found == 0 {
                println!("   {}", ui::muted("(none)"));
            }
        }

        Commands::Unresolved => {
            let db = open_read_only(&database)?;
            let mut count = 0usize;
            ui::header(Icons::HOURGLASS, "Unresolved product dependencies");
            db.query_unresolved_product_dependencies(|edge| {
                count += 1;
                ui::summary_row(
                    &format!("#{} ({})", edge.product_pk, edge.dependency_type),
                    &edge.unresolved_path,
                );
                true
            })?;
            if count == 0 {
                ui::success("Every product dependency is resolved");
            }
        }

        Commands::Resolve => {
            let db = AssetDatabase::open_path(&database, false)
                .with_context(|| format!("failed to open {}", database.display()))?;
            ui::header(Icons::LINK, "Resolving product dependencies...");
            let stats = Resolver::new(&db).resolve_all()?;
            println!("{}", stats);
            if stats.unresolved == 0 {
                ui::success("Resolution complete");
            }
        }
    }

    Ok(())
}

fn open_read_only(path: &Path) -> anyhow::Result<AssetDatabase> {
    AssetDatabase::open_path(path, true).with_context(|| format!("failed to open {}", path.display()))
}

fn print_table<'a, T: 'a, R>(items: &'a [T])
where
    R: tabled::Tabled + From<&'a T>,
{
    let table = ui::render::<T, R>(items);
    if table.is_empty() {
        println!("   {}", ui::muted("(none)"));
    } else {
        println!("{}", table);
    }
}
