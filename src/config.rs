use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name used when no database location is configured.
pub const DEFAULT_DATABASE_NAME: &str = "assetdb.sqlite";

/// Anything that can say where the asset database lives.
pub trait DatabaseLocation {
    fn database_path(&self) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetDbConfig {
    pub database: Option<String>,
    /// Platform applied to product and job queries when none is given.
    pub platform: Option<String>,
}

impl DatabaseLocation for AssetDbConfig {
    fn database_path(&self) -> Option<PathBuf> {
        self.database.as_ref().map(PathBuf::from)
    }
}

impl DatabaseLocation for PathBuf {
    fn database_path(&self) -> Option<PathBuf> {
        Some(self.clone())
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("assetdb.toml")
}

/// Ask the provider first, fall back to [`DEFAULT_DATABASE_NAME`] in the working directory.
pub fn resolve_database_path(location: Option<&dyn DatabaseLocation>) -> PathBuf {
    location
        .and_then(|l| l.database_path())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_NAME))
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<AssetDbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AssetDbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &AssetDbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> std::io::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
