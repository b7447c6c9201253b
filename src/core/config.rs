use crate::config::{Config, ResolvedSource};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::colors::{CYAN, GREY, RESET};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        println!("{}", content);
        Ok(())
    }

    /// Print the data source a command would use, password masked.
    pub fn print_source(resolved: &ResolvedSource) {
        let cfg = resolved.config.masked();
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| format!("{GREY}-{RESET}"));

        println!("{CYAN}• Origin:{RESET}   {}", resolved.origin);
        println!("{CYAN}• Database:{RESET} {}", cfg.database);
        println!("{CYAN}• Table:{RESET}    {}", cfg.table_name);
        println!("{CYAN}• Row cap:{RESET}  {}", cfg.row_cap);
        println!("{CYAN}• Host:{RESET}     {}", or_dash(cfg.host));
        println!("{CYAN}• Port:{RESET}     {}", or_dash(cfg.port.map(|p| p.to_string())));
        println!("{CYAN}• User:{RESET}     {}", or_dash(cfg.user));
        println!("{CYAN}• Password:{RESET} {}", or_dash(cfg.password));
    }

    /// Report fields missing from the config file. Returns whether the
    /// file is complete.
    pub fn check(cfg: &Config) -> AppResult<bool> {
        cfg.validate()?;
        let missing = Config::missing_fields()?;
        if missing.is_empty() {
            success("Configuration file is complete.");
            Ok(true)
        } else {
            warning(format!(
                "Missing fields (defaults in use): {}",
                missing.join(", ")
            ));
            Ok(false)
        }
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot launch editor '{ed}': {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("editor '{ed}' exited with {status}")));
        }
        Ok(())
    }
}
