use crate::config::BooklyConfig;
use crate::database::Database;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct BootstrapResources {
    pub directories_created: Vec<String>,
    pub database_initialized: bool,
    pub database: Database,
}

/// Prepares the on-disk layout and opens a migrated database.
pub fn initialize(config: &BooklyConfig) -> Result<BootstrapResources> {
    let mut directories_created = Vec::new();
    create_dir_if_missing(&config.paths.data_dir, &mut directories_created)?;
    create_dir_if_missing(&config.paths.logs_dir, &mut directories_created)?;

    let database = Database::connect(&config.paths)?;
    let database_initialized = database.ensure_migrations()?;

    Ok(BootstrapResources {
        directories_created,
        database_initialized,
        database,
    })
}

fn create_dir_if_missing(path: &Path, created: &mut Vec<String>) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        created.push(path.display().to_string());
    }
    Ok(())
}
