use crate::cli::parser::{Commands, ReportKind};
use crate::config::Config;
use crate::core::report::{
    DeviceDimension, DeviceRow, FilterOptions, NO_DATA, StatusDimension, StatusRow,
    device_breakdown, filter_options, status_breakdown, summary,
};
use crate::errors::AppResult;
use crate::export::read_snapshot;
use crate::models::{ApplicationRecord, DeviceClass};
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, GREY, RESET, color_for_pct, color_for_status};
use crate::utils::date::month_name;
use crate::utils::formatting::{bold, format_pct};
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config, cli_db: Option<&str>) -> AppResult<()> {
    if let Commands::Report {
        kind,
        filters,
        view,
        snapshot,
    } = cmd
    {
        let filters = filters.to_filters()?;
        let table = match snapshot {
            Some(file) => read_snapshot(&expand_tilde(file))?,
            None => super::load_view(cfg, cli_db, *view)?.0,
        };

        if *kind == ReportKind::Options {
            print_options(&filter_options(table.records()));
            return Ok(());
        }

        let records = filters.apply(table.records());
        if records.is_empty() {
            println!("{NO_DATA}");
            return Ok(());
        }

        match kind {
            ReportKind::Summary => print_summary(&records),
            ReportKind::Daily => print_status(
                "Active vs Inactive by day of month",
                "Day",
                &status_breakdown(&records, StatusDimension::DayOfMonth),
            ),
            ReportKind::Monthly => print_status(
                "Active vs Inactive by month",
                "Month",
                &status_breakdown(&records, StatusDimension::YearMonth),
            ),
            ReportKind::Location => print_status(
                "Active vs Inactive by location",
                "Location",
                &status_breakdown(&records, StatusDimension::Location),
            ),
            ReportKind::Regsource => print_status(
                "Active vs Inactive by registration source",
                "Source",
                &status_breakdown(&records, StatusDimension::Regsource),
            ),
            ReportKind::Device => print_device(
                "Device distribution",
                "",
                &device_breakdown(&records, DeviceDimension::Overall),
            ),
            ReportKind::DeviceDaily => print_device(
                "Devices by day of month",
                "Day",
                &device_breakdown(&records, DeviceDimension::DayOfMonth),
            ),
            ReportKind::DeviceMonthly => print_device(
                "Devices by month",
                "Month",
                &device_breakdown(&records, DeviceDimension::YearMonth),
            ),
            ReportKind::DeviceLocation => print_device(
                "Devices by location",
                "Location",
                &device_breakdown(&records, DeviceDimension::Location),
            ),
            ReportKind::Options => {}
        }
    }

    Ok(())
}

fn print_summary(records: &[&ApplicationRecord]) {
    let s = summary(records);
    let active = color_for_status("Active");
    let inactive = color_for_status("Inactive");

    header("Summary");
    println!("{} {}", bold("Total applications:"), s.total);
    println!("{} {active}{}{RESET}", bold("Active:"), s.active);
    println!("{} {inactive}{}{RESET}", bold("Inactive:"), s.inactive);
    println!(
        "{} {}{}{RESET}",
        bold("Active rate:"),
        color_for_pct(s.active_pct),
        format_pct(s.active_pct)
    );
    println!("{} {}", bold("Mobile:"), s.mobile);
    println!("{} {}", bold("Desktop:"), s.desktop);
    println!(
        "{} {}{}{RESET}",
        bold("Mobile share:"),
        color_for_pct(s.mobile_pct),
        format_pct(s.mobile_pct)
    );
}

fn print_status(title: &str, key: &str, rows: &[StatusRow]) {
    header(title);
    let mut t = Table::new(vec![
        Column::left(key),
        Column::right("Active"),
        Column::right("Inactive"),
        Column::right("Total"),
        Column::right("Active %"),
    ]);
    for r in rows {
        t.add_row(vec![
            r.key.clone(),
            r.active.to_string(),
            r.inactive.to_string(),
            r.total.to_string(),
            format_pct(r.active_pct),
        ]);
    }
    print!("{}", t.render());
}

fn print_device(title: &str, key: &str, rows: &[DeviceRow]) {
    header(title);
    let mut columns = Vec::new();
    if !key.is_empty() {
        columns.push(Column::left(key));
    }
    columns.extend([
        Column::right(DeviceClass::Mobile.label()),
        Column::right(DeviceClass::Desktop.label()),
        Column::right(DeviceClass::Other.label()),
        Column::right("Total"),
        Column::right("Mobile %"),
    ]);

    let mut t = Table::new(columns);
    for r in rows {
        let mut cells = Vec::new();
        if !key.is_empty() {
            cells.push(r.key.clone());
        }
        cells.extend([
            r.mobile.to_string(),
            r.desktop.to_string(),
            r.other.to_string(),
            r.total.to_string(),
            format_pct(r.mobile_pct),
        ]);
        t.add_row(cells);
    }
    print!("{}", t.render());
}

fn print_options(opts: &FilterOptions) {
    header("Filter options");
    if opts.min_date.is_none() {
        println!("{NO_DATA}");
        return;
    }

    let list = |items: &[String]| {
        if items.is_empty() {
            format!("{GREY}--{RESET}")
        } else {
            items.join(", ")
        }
    };
    let months: Vec<String> = opts
        .months
        .iter()
        .map(|m| month_name(*m).to_string())
        .collect();

    println!("{CYAN}• Months:{RESET}      {}", list(&months));
    println!("{CYAN}• Countries:{RESET}   {}", list(&opts.countries));
    println!("{CYAN}• Job titles:{RESET}  {}", list(&opts.job_titles));
    println!("{CYAN}• Statuses:{RESET}    {}", list(&opts.statuses));
    println!("{CYAN}• Devices:{RESET}     {}", list(&opts.devices));
    println!("{CYAN}• Reg. sources:{RESET} {}", list(&opts.regsources));
    if let (Some(min), Some(max)) = (opts.min_date, opts.max_date) {
        println!("{CYAN}• Date range:{RESET}  {min} → {max}");
    }
}
