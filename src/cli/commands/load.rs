use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::NO_DATA;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config, cli_db: Option<&str>) -> AppResult<()> {
    if let Commands::Load { view } = cmd {
        let (table, report) = super::load_view(cfg, cli_db, *view)?;

        header(format!("Pipeline ({view})"));
        println!("{CYAN}• Loaded:{RESET}      {}", report.loaded);
        println!("{CYAN}• Dropped:{RESET}     {}", report.dropped);
        println!("{CYAN}• Normalized:{RESET}  {}", report.normalized);
        if let Some(unique) = report.deduplicated {
            println!("{CYAN}• Unique:{RESET}      {unique}");
        }
        if let Some(err) = &report.load_error {
            println!("{CYAN}• Load error:{RESET}  {RED}{err}{RESET}");
        }

        if table.is_empty() {
            println!("\n{NO_DATA}");
        }
    }

    Ok(())
}
