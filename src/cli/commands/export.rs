use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::NO_DATA;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::warning;

pub fn handle(cmd: &Commands, cfg: &Config, cli_db: Option<&str>) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        view,
        force,
    } = cmd
    {
        let (table, _) = super::load_view(cfg, cli_db, *view)?;
        if table.is_empty() {
            warning(NO_DATA);
        }
        ExportLogic::export(&table, *format, file, *force)?;
    }
    Ok(())
}
