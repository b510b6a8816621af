//! CLI definition using clap

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use freshroute_domain::service::ReportKind;
use freshroute_domain::validation::parse_date;
use freshroute_domain::PackageStatus;
use freshroute_types::OutputFormat;

#[derive(Parser)]
#[command(name = "freshroute")]
#[command(version)]
#[command(about = "Package and delivery route tracking for FreshRoute Logistics")]
#[command(long_about = None)]
pub struct Cli {
    /// Command to run. Starts the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory override (holds packages.json and routes.json)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive console
    Menu,

    /// List packages
    Packages {
        /// Only packages with this status
        #[arg(long)]
        status: Option<StatusArg>,

        /// Only packages on this route
        #[arg(long)]
        route: Option<String>,

        /// Only packages not assigned to any route
        #[arg(long, conflicts_with = "route")]
        unassigned: bool,
    },

    /// List routes
    Routes {
        /// Only routes scheduled on this date (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,

        /// Only routes driven by this driver (case-insensitive)
        #[arg(long)]
        driver: Option<String>,
    },

    /// Show a package with its route and delivery timeline
    Track {
        package_id: String,
    },

    /// Assign a package to a route
    Assign {
        package_id: String,
        route_id: String,
    },

    /// Remove a package from its route
    Unassign {
        package_id: String,
    },

    /// Set a package's delivery status
    Status {
        package_id: String,
        status: StatusArg,
    },

    /// Mark a package delivered
    Deliver {
        package_id: String,

        /// Proof of delivery note (e.g., "left at door")
        #[arg(long)]
        proof: Option<String>,
    },

    /// Generate a report
    Report {
        kind: ReportArg,

        /// Day for the delivered report (YYYY-MM-DD, default today)
        #[arg(long, value_parser = date_arg)]
        date: Option<NaiveDate>,

        /// Also write the report as CSV into the export directory
        #[arg(long)]
        export: bool,

        /// CSV output path (implies --export)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check that package and route links agree
    CheckLinks {
        /// Rewrite routes to match the packages' route ids
        #[arg(long)]
        repair: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set export directory
        #[arg(long)]
        set_export_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set liters of fuel estimated per package
        #[arg(long)]
        set_fuel_rate: Option<f64>,

        /// Set days before an open package counts as delayed
        #[arg(long)]
        set_delay_days: Option<i64>,

        /// Fail instead of continuing when a data file is unreadable
        #[arg(long)]
        set_strict_storage: Option<bool>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    OutForDelivery,
    Delivered,
}

impl From<StatusArg> for PackageStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => PackageStatus::Pending,
            StatusArg::OutForDelivery => PackageStatus::OutForDelivery,
            StatusArg::Delivered => PackageStatus::Delivered,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    Delivered,
    Drivers,
    Delayed,
    Fuel,
    Addresses,
    Summary,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Delivered => ReportKind::Delivered,
            ReportArg::Drivers => ReportKind::Drivers,
            ReportArg::Delayed => ReportKind::Delayed,
            ReportArg::Fuel => ReportKind::Fuel,
            ReportArg::Addresses => ReportKind::Addresses,
            ReportArg::Summary => ReportKind::Summary,
        }
    }
}
