use crate::cli::parser::Commands;
use crate::config::source::{resolve_local, store_location};
use crate::config::{Config, remote};
use crate::core::config::ConfigLogic;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, cli_db: Option<&str>) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        source,
        publish,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        // ---- PRINT CONFIG ----
        if *print_config {
            if path.exists() {
                println!("📄 Current configuration ({}):\n", path.display());
                ConfigLogic::print(&path)?;
            } else {
                warning(format!(
                    "No configuration file at {}; defaults in use:",
                    path.display()
                ));
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        // ---- CHECK ----
        if *check {
            ConfigLogic::check(cfg)?;
        }

        // ---- RESOLVED SOURCE ----
        if *source {
            let resolved = super::resolve_source(cfg, cli_db)?;
            ConfigLogic::print_source(&resolved);
        }

        // ---- PUBLISH ----
        if *publish {
            let (store, collection) = store_location(cfg).ok_or_else(|| {
                AppError::Config(
                    "no config store: set CONFIG_STORE_URI or config_store".into(),
                )
            })?;
            let local = resolve_local(cfg, cli_db)
                .map_err(|e| AppError::ConfigUnavailable(e.to_string()))?;

            let doc_id = remote::publish_connection_config(&store, &collection, &local)?;
            success(format!(
                "Connection config published to {store} (collection '{collection}', document {doc_id})."
            ));

            if let Ok(pool) = DbPool::new(&cfg.database) {
                ttlog_quiet(
                    &pool.conn,
                    "publish_config",
                    &collection,
                    &format!("Published to {store} as document {doc_id}"),
                );
            }
        }

        // ---- EDIT CONFIG ----
        if *edit_config {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "no configuration file at {}: run `jobinsight init` first",
                    path.display()
                )));
            }
            ConfigLogic::edit(&path, editor)?;
            info(format!("Configuration file edited: {}", path.display()));
        }
    }

    Ok(())
}
