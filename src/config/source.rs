//! Data-source configuration and the resolution chain:
//! `--db` override → remote config document → environment (with
//! config-file defaults) → failure.

use super::Config;
use super::remote;
use crate::db::schema::is_valid_identifier;
use crate::ui::messages::{info, warning};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Connection parameters for the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub database: String,
    #[serde(default = "default_table")]
    pub table_name: String,
    #[serde(default = "default_row_cap")]
    pub row_cap: u32,
}

fn default_table() -> String {
    super::DEFAULT_TABLE.to_string()
}
fn default_row_cap() -> u32 {
    super::DEFAULT_ROW_CAP
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ConfigFailure> {
        if self.database.trim().is_empty() {
            return Err(ConfigFailure::NoDatabase {
                tried: "database is empty".into(),
            });
        }
        if !is_valid_identifier(&self.table_name) {
            return Err(ConfigFailure::InvalidTableName(self.table_name.clone()));
        }
        if self.row_cap == 0 {
            return Err(ConfigFailure::InvalidRowCap("0".into()));
        }
        Ok(())
    }

    /// Copy safe to print: the password is masked.
    pub fn masked(&self) -> SourceConfig {
        SourceConfig {
            password: self.password.as_ref().map(|_| "******".to_string()),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    CommandLine,
    Remote { store: String, collection: String },
    Environment,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigOrigin::CommandLine => write!(f, "command line (--db)"),
            ConfigOrigin::Remote { store, collection } => {
                write!(f, "remote document ({store}, collection '{collection}')")
            }
            ConfigOrigin::Environment => write!(f, "environment / config file"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub config: SourceConfig,
    pub origin: ConfigOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigFailure {
    #[error("no database configured ({tried})")]
    NoDatabase { tried: String },

    #[error("invalid row cap '{0}': expected a positive integer")]
    InvalidRowCap(String),

    #[error("invalid port '{0}'")]
    InvalidPort(String),

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),
}

/// Resolve against the process environment.
pub fn resolve(cfg: &Config, cli_db: Option<&str>) -> Result<ResolvedSource, ConfigFailure> {
    resolve_with(cfg, cli_db, |key| std::env::var(key).ok())
}

/// Resolve with an explicit variable lookup.
pub fn resolve_with<F>(
    cfg: &Config,
    cli_db: Option<&str>,
    lookup: F,
) -> Result<ResolvedSource, ConfigFailure>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    //
    // 1) explicit override
    //
    if cli_db.is_some() {
        return Ok(ResolvedSource {
            config: local_with(cfg, cli_db, &var)?,
            origin: ConfigOrigin::CommandLine,
        });
    }

    //
    // 2) remote document
    //
    if let Some((store, collection)) = store_location_with(cfg, &var) {
        match remote::fetch_connection_config(&store, &collection) {
            Ok(Some(config)) => match config.validate() {
                Ok(()) => {
                    info("Configuration retrieved from the config store.");
                    return Ok(ResolvedSource {
                        config,
                        origin: ConfigOrigin::Remote { store, collection },
                    });
                }
                Err(e) => warning(format!("Remote configuration rejected: {e}")),
            },
            Ok(None) => warning(format!(
                "No '{}' document with a connection_config in collection '{collection}'.",
                remote::CONFIG_DOCUMENT_TYPE
            )),
            Err(e) => warning(format!("Config store unavailable: {e}")),
        }
        warning("Using local fallback configuration from the environment.");
    }

    //
    // 3) environment + config file defaults
    //
    Ok(ResolvedSource {
        config: local_with(cfg, None, &var)?,
        origin: ConfigOrigin::Environment,
    })
}

/// Local configuration only (`--db`, environment, config file), never the
/// remote document. This is what `ingest` writes to and what
/// `config --publish` uploads.
pub fn resolve_local(cfg: &Config, cli_db: Option<&str>) -> Result<SourceConfig, ConfigFailure> {
    let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    local_with(cfg, cli_db, &var)
}

/// Document store and collection, if a store is configured.
pub fn store_location(cfg: &Config) -> Option<(String, String)> {
    let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    store_location_with(cfg, &var)
}

fn store_location_with<F>(cfg: &Config, var: &F) -> Option<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    let store = var("CONFIG_STORE_URI").or_else(|| cfg.config_store.clone())?;
    let collection =
        var("CONFIG_STORE_COLLECTION").unwrap_or_else(|| cfg.config_collection.clone());
    Some((store, collection))
}

fn local_with<F>(cfg: &Config, cli_db: Option<&str>, var: &F) -> Result<SourceConfig, ConfigFailure>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match cli_db {
        Some(db) => {
            let local = Config {
                database: db.to_string(),
                ..cfg.clone()
            };
            let mut config = from_environment(&local, var)?;
            config.database = db.to_string();
            config
        }
        None => from_environment(cfg, var)?,
    };
    config.validate()?;
    Ok(config)
}

fn from_environment<F>(cfg: &Config, var: &F) -> Result<SourceConfig, ConfigFailure>
where
    F: Fn(&str) -> Option<String>,
{
    let row_cap = match var("SQL_ROW_CAP") {
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ConfigFailure::InvalidRowCap(raw)),
        },
        None => cfg.row_cap,
    };

    let port = match var("SQL_PORT") {
        Some(raw) => Some(
            raw.trim()
                .parse::<u16>()
                .map_err(|_| ConfigFailure::InvalidPort(raw.clone()))?,
        ),
        None => None,
    };

    let database = var("SQL_DATABASE").unwrap_or_else(|| cfg.database.clone());
    if database.trim().is_empty() {
        return Err(ConfigFailure::NoDatabase {
            tried: "SQL_DATABASE is unset and the config file has no database".into(),
        });
    }

    Ok(SourceConfig {
        host: var("SQL_HOST"),
        port,
        user: var("SQL_USER"),
        password: var("SQL_PASSWORD"),
        database,
        table_name: var("SQL_TABLE_NAME").unwrap_or_else(|| cfg.table_name.clone()),
        row_cap,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg() -> Config {
        Config {
            database: "/tmp/local.sqlite".into(),
            ..Config::default()
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn environment_overrides_config_file() {
        let resolved = resolve_with(
            &cfg(),
            None,
            env(&[
                ("SQL_DATABASE", "/data/jobs.sqlite"),
                ("SQL_TABLE_NAME", "applications"),
                ("SQL_ROW_CAP", "500"),
                ("SQL_PORT", "3306"),
                ("SQL_PASSWORD", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!(resolved.origin, ConfigOrigin::Environment);
        assert_eq!(resolved.config.database, "/data/jobs.sqlite");
        assert_eq!(resolved.config.table_name, "applications");
        assert_eq!(resolved.config.row_cap, 500);
        assert_eq!(resolved.config.port, Some(3306));
        assert_eq!(resolved.config.masked().password.as_deref(), Some("******"));
    }

    #[test]
    fn config_file_defaults_when_env_is_empty() {
        let resolved = resolve_with(&cfg(), None, env(&[])).unwrap();
        assert_eq!(resolved.config.database, "/tmp/local.sqlite");
        assert_eq!(resolved.config.table_name, "jobseeker_data");
        assert_eq!(resolved.config.row_cap, 20_000);
    }

    #[test]
    fn command_line_wins() {
        let resolved = resolve_with(
            &cfg(),
            Some("/cli.sqlite"),
            env(&[("SQL_DATABASE", "/env.sqlite")]),
        )
        .unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::CommandLine);
        assert_eq!(resolved.config.database, "/cli.sqlite");
    }

    #[test]
    fn missing_database_is_a_failure() {
        let mut c = cfg();
        c.database = String::new();
        let err = resolve_with(&c, None, env(&[])).unwrap_err();
        assert!(matches!(err, ConfigFailure::NoDatabase { .. }));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = resolve_with(&cfg(), None, env(&[("SQL_ROW_CAP", "0")])).unwrap_err();
        assert_eq!(err, ConfigFailure::InvalidRowCap("0".into()));

        let err = resolve_with(&cfg(), None, env(&[("SQL_TABLE_NAME", "x; DROP")])).unwrap_err();
        assert_eq!(err, ConfigFailure::InvalidTableName("x; DROP".into()));

        let err = resolve_with(&cfg(), None, env(&[("SQL_PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigFailure::InvalidPort("http".into()));
    }

    #[test]
    fn remote_document_beats_environment() {
        let store = std::env::temp_dir().join("resolve_remote_jobinsight_store.sqlite");
        std::fs::remove_file(&store).ok();
        let store = store.to_string_lossy().to_string();

        let remote_cfg = SourceConfig {
            host: None,
            port: None,
            user: None,
            password: None,
            database: "/remote/jobs.sqlite".into(),
            table_name: "jobseeker_data".into(),
            row_cap: 10,
        };
        remote::publish_connection_config(&store, "app_config", &remote_cfg).unwrap();

        let resolved = resolve_with(
            &cfg(),
            None,
            env(&[
                ("CONFIG_STORE_URI", store.as_str()),
                ("SQL_DATABASE", "/env.sqlite"),
            ]),
        )
        .unwrap();

        assert!(matches!(resolved.origin, ConfigOrigin::Remote { .. }));
        assert_eq!(resolved.config, remote_cfg);
    }

    #[test]
    fn unreachable_store_falls_back_to_environment() {
        let resolved = resolve_with(
            &cfg(),
            None,
            env(&[("CONFIG_STORE_URI", "/definitely/not/here.sqlite")]),
        )
        .unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Environment);
    }
}
