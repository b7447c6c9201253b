//! jobinsight library root.
//! Exposes the CLI parser, the high-level run() function and the pipeline
//! modules (loader, normalizer, deduplicator, reports).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cli_db = cli.db.as_deref();
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, cli_db),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Load { .. } => cli::commands::load::handle(&cli.command, cfg, cli_db),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg, cli_db),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg, cli_db),
        Commands::Ingest { .. } => cli::commands::ingest::handle(&cli.command, cfg, cli_db),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1) .env, if present
    dotenv::dotenv().ok();

    // 2) parse CLI
    let cli = Cli::parse();
    ui::messages::set_quiet(cli.quiet);

    // 3) load config once
    let mut cfg = Config::load()?;

    // 4) the --db override also moves the local database
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
