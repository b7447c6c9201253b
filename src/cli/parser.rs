use crate::core::pipeline::DataView;
use crate::core::report::Filters;
use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::utils::date::{parse_date, parse_month};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface definition for jobinsight
/// Analytics over job-applicant data stored in SQLite
#[derive(Parser)]
#[command(
    name = "jobinsight",
    version = env!("CARGO_PKG_VERSION"),
    about = "Job-applicant analytics: load, normalize, deduplicate and report on application records",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Only print warnings, errors and command output
    #[arg(global = true, long = "quiet", short = 'q')]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file and the data source configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "source",
            help = "Show the resolved data source (--db, config store or environment)"
        )]
        source: bool,

        #[arg(
            long = "publish",
            help = "Publish the local data source configuration to the config store"
        )]
        publish: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            requires = "edit_config",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Load, normalize and (optionally) deduplicate the data, then print
    /// the pipeline counts
    Load {
        #[arg(long, value_enum, default_value_t = DataView::Full)]
        view: DataView,
    },

    /// Print an aggregate report
    Report {
        #[arg(value_enum)]
        kind: ReportKind,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value_t = DataView::Full)]
        view: DataView,

        /// Read records from a JSON snapshot instead of the database
        #[arg(long, value_name = "FILE", conflicts_with = "view")]
        snapshot: Option<String>,
    },

    /// Export the normalized records as a JSON or CSV snapshot
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, value_enum, default_value_t = DataView::Full)]
        view: DataView,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Bulk-load a CSV file into the applications table
    Ingest {
        /// CSV file with a header row
        #[arg(long, value_name = "CSV")]
        file: String,

        /// Failure log (default: `failure_log` from the config file)
        #[arg(long, value_name = "PATH")]
        failures: Option<String>,

        /// Rows per transaction (default: `batch_size` from the config file)
        #[arg(long = "batch-size")]
        batch_size: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Totals, active/inactive and device shares
    Summary,
    /// Active/Inactive by day of month
    Daily,
    /// Active/Inactive by year-month
    Monthly,
    /// Active/Inactive by country
    Location,
    /// Active/Inactive by registration source
    Regsource,
    /// Mobile/Desktop/Other overall
    Device,
    /// Mobile/Desktop/Other by day of month
    DeviceDaily,
    /// Mobile/Desktop/Other by year-month
    DeviceMonthly,
    /// Mobile/Desktop/Other by country
    DeviceLocation,
    /// Values available for each filter
    Options,
}

/// Record filters shared by the report views.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Months (1-12 or names), comma separated or repeated
    #[arg(long = "month", value_delimiter = ',', value_parser = month_arg)]
    pub months: Vec<u32>,

    #[arg(long = "country", value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Job title, or `all`
    #[arg(long = "title")]
    pub job_title: Option<String>,

    /// Raw application statuses (case-insensitive)
    #[arg(long = "status", value_delimiter = ',')]
    pub statuses: Vec<String>,

    /// Device types (case-insensitive)
    #[arg(long = "device", value_delimiter = ',')]
    pub devices: Vec<String>,

    #[arg(long = "regsource", value_delimiter = ',')]
    pub regsources: Vec<String>,

    /// First day included (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> AppResult<Filters> {
        let filters = Filters {
            months: self.months.clone(),
            countries: self.countries.clone(),
            job_title: self.job_title.clone(),
            statuses: self.statuses.clone(),
            devices: self.devices.clone(),
            regsources: self.regsources.clone(),
            from: self.from,
            to: self.to,
        };
        filters.validate()?;
        Ok(filters)
    }
}

fn month_arg(s: &str) -> Result<u32, String> {
    parse_month(s).ok_or_else(|| format!("'{s}' is not a month (1-12 or a month name)"))
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a date (YYYY-MM-DD)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_filters_parse() {
        let cli = Cli::try_parse_from([
            "jobinsight",
            "report",
            "device-location",
            "--month",
            "jan,3",
            "--device",
            "mobile",
            "--from",
            "2025-01-01",
            "--view",
            "latest-unique",
        ])
        .unwrap();

        let Commands::Report {
            kind,
            filters,
            view,
            snapshot,
        } = cli.command
        else {
            panic!("expected report");
        };
        assert_eq!(kind, ReportKind::DeviceLocation);
        assert_eq!(view, DataView::LatestUnique);
        assert_eq!(snapshot, None);
        let f = filters.to_filters().unwrap();
        assert_eq!(f.months, vec![1, 3]);
        assert_eq!(f.devices, vec!["mobile"]);
        assert_eq!(f.from, NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn snapshot_and_view_are_exclusive() {
        let res = Cli::try_parse_from([
            "jobinsight",
            "report",
            "summary",
            "--snapshot",
            "/tmp/s.json",
            "--view",
            "latest-unique",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn bad_month_is_rejected_by_the_parser() {
        let res = Cli::try_parse_from(["jobinsight", "report", "summary", "--month", "13"]);
        assert!(res.is_err());
    }
}
