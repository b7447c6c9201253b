use crate::db::schema::is_valid_identifier;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod remote;
pub mod source;

pub use source::{ConfigFailure, ConfigOrigin, ResolvedSource, SourceConfig};

pub const DEFAULT_TABLE: &str = "jobseeker_data";
pub const DEFAULT_ROW_CAP: u32 = 20_000;
pub const DEFAULT_COLLECTION: &str = "app_config";
pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local SQLite database: default data source, ingest target and
    /// home of the internal log table.
    pub database: String,
    #[serde(default = "default_table")]
    pub table_name: String,
    #[serde(default = "default_row_cap")]
    pub row_cap: u32,
    /// Document store holding the remote connection config, if any.
    #[serde(default)]
    pub config_store: Option<String>,
    #[serde(default = "default_collection")]
    pub config_collection: String,
    #[serde(default = "default_failure_log")]
    pub failure_log: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
fn default_row_cap() -> u32 {
    DEFAULT_ROW_CAP
}
fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}
fn default_failure_log() -> String {
    "failed_inserts_log.csv".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            table_name: default_table(),
            row_cap: default_row_cap(),
            config_store: None,
            config_collection: default_collection(),
            failure_log: default_failure_log(),
            batch_size: default_batch_size(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("jobinsight")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".jobinsight")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("jobinsight.conf")
    }

    /// Return the full path of the default SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("jobinsight.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !is_valid_identifier(&self.table_name) {
            return Err(AppError::InvalidTableName(self.table_name.clone()));
        }
        if self.row_cap == 0 {
            return Err(AppError::Config("row_cap must be a positive integer".into()));
        }
        if self.batch_size == 0 {
            return Err(AppError::Config(
                "batch_size must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    /// Fields missing from the config file on disk (serde fills them with
    /// defaults, `config --check` reports them).
    pub fn missing_fields() -> AppResult<Vec<&'static str>> {
        let path = Self::config_file();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;
        let expected = [
            "database",
            "table_name",
            "row_cap",
            "config_store",
            "config_collection",
            "failure_log",
            "batch_size",
        ];

        Ok(expected
            .into_iter()
            .filter(|k| yaml.get(*k).is_none())
            .collect())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            success(format!("Config file: {}", Self::config_file().display()));
        }

        Ok(config)
    }
}
