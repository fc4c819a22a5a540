use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

use dietlog_core::StoreConfig;

const DB_FILE_NAME: &str = "dietlog.db";

pub struct Config {
    pub db_path: PathBuf,
    pub unique_meal_plans: bool,
}

impl Config {
    /// Resolve the database location. An explicit path (from `--db` or
    /// `DIETLOG_DB`) wins over the platform data directory.
    pub fn load(db_override: Option<PathBuf>, unique_meal_plans: bool) -> Result<Self> {
        let db_path = match db_override {
            Some(path) => path,
            None => Self::default_db_path()?,
        };

        Ok(Config {
            db_path,
            unique_meal_plans,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", "dietlog").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(data_dir.join(DB_FILE_NAME))
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            db_path: self.db_path.clone(),
            unique_meal_plans: self.unique_meal_plans,
        }
    }
}
