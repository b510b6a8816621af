//! Command implementations

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use freshroute_app::{Config, LogisticsService};
use freshroute_domain::service::ReportKind;
use freshroute_domain::{PackageRepository, PackageStatus, RouteRepository};
use freshroute_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands, ReportArg, StatusArg};
use crate::menu;
use crate::output;
use crate::prompt::Prompter;

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);

    let command = cli.command.unwrap_or(Commands::Menu);
    if let Commands::Config {
        show,
        set_data_dir,
        set_export_dir,
        set_output,
        set_fuel_rate,
        set_delay_days,
        set_strict_storage,
        reset,
    } = command
    {
        return cmd_config(
            show,
            set_data_dir,
            set_export_dir,
            set_output,
            set_fuel_rate,
            set_delay_days,
            set_strict_storage,
            reset,
        );
    }

    let service = LogisticsService::open(config)?;
    debug!(format = %format, "executing command");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Menu => {
            drop(out);
            cmd_menu(&service)
        }
        Commands::Packages {
            status,
            route,
            unassigned,
        } => cmd_packages(&service, &mut out, format, status, route, unassigned),
        Commands::Routes { date, driver } => cmd_routes(&service, &mut out, format, date, driver),
        Commands::Track { package_id } => cmd_track(&service, &mut out, format, &package_id),
        Commands::Assign {
            package_id,
            route_id,
        } => cmd_assign(&service, &mut out, format, &package_id, &route_id),
        Commands::Unassign { package_id } => cmd_unassign(&service, &mut out, format, &package_id),
        Commands::Status { package_id, status } => {
            cmd_status(&service, &mut out, format, &package_id, status)
        }
        Commands::Deliver { package_id, proof } => {
            cmd_deliver(&service, &mut out, format, &package_id, proof)
        }
        Commands::Report {
            kind,
            date,
            export,
            output,
        } => cmd_report(&service, &mut out, format, kind, date, export, output),
        Commands::CheckLinks { repair } => cmd_check_links(&service, &mut out, format, repair),
        // handled before the stores are opened
        Commands::Config { .. } => Ok(()),
    }
}

fn cmd_menu(service: &LogisticsService) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    menu::run(service, &mut prompter)
}

fn cmd_packages<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    status: Option<StatusArg>,
    route: Option<String>,
    unassigned: bool,
) -> Result<()> {
    let store = service.packages();
    let mut packages = if unassigned {
        store.filter_unassigned()?
    } else if let Some(ref route_id) = route {
        store.filter_by_route(route_id)?
    } else {
        store.list_all()?
    };

    if let Some(status) = status {
        let status = PackageStatus::from(status);
        packages.retain(|p| p.status == status);
    }

    match format {
        OutputFormat::Json => output::output_json(out, &packages),
        OutputFormat::Table => output::print_packages_table(out, &packages),
    }
}

fn cmd_routes<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    date: Option<NaiveDate>,
    driver: Option<String>,
) -> Result<()> {
    let store = service.routes();
    let mut routes = match driver {
        Some(ref name) => store.filter_by_driver(name)?,
        None => store.list_all()?,
    };
    if let Some(date) = date {
        routes.retain(|r| r.date == date);
    }

    match format {
        OutputFormat::Json => output::output_json(out, &routes),
        OutputFormat::Table => output::print_routes_table(out, &routes),
    }
}

fn cmd_track<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    package_id: &str,
) -> Result<()> {
    let info = service.tracker().track(package_id)?;
    match format {
        OutputFormat::Json => output::output_json(out, &info),
        OutputFormat::Table => output::print_tracking(out, &info),
    }
}

fn cmd_assign<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    package_id: &str,
    route_id: &str,
) -> Result<()> {
    let (package, route) = service.planner().assign(package_id, route_id)?;
    match format {
        OutputFormat::Json => output::output_json(out, &json!({ "package": package, "route": route })),
        OutputFormat::Table => {
            writeln!(out, "Package {} assigned to route {}", package.package_id, route.route_id)?;
            writeln!(
                out,
                "Route now has {} package(s), estimated fuel {:.2} L",
                route.package_count(),
                route.estimated_fuel
            )?;
            Ok(())
        }
    }
}

fn cmd_unassign<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    package_id: &str,
) -> Result<()> {
    let previous = service.find_package(package_id)?.route_id;
    let package = service.planner().unassign(package_id)?;
    match format {
        OutputFormat::Json => output::output_json(out, &package),
        OutputFormat::Table => {
            match previous {
                Some(route_id) => writeln!(out, "Package {} removed from route {}", package.package_id, route_id)?,
                None => writeln!(out, "Package {} was not assigned to a route", package.package_id)?,
            }
            Ok(())
        }
    }
}

fn cmd_status<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    package_id: &str,
    status: StatusArg,
) -> Result<()> {
    let package = service
        .tracker()
        .update_status(package_id, PackageStatus::from(status))?;
    match format {
        OutputFormat::Json => output::output_json(out, &package),
        OutputFormat::Table => {
            writeln!(out, "Package {} is now {}", package.package_id, package.status)?;
            Ok(())
        }
    }
}

fn cmd_deliver<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    package_id: &str,
    proof: Option<String>,
) -> Result<()> {
    let proof = proof.filter(|p| !p.trim().is_empty());
    let package = service.tracker().mark_delivered(package_id, proof)?;
    match format {
        OutputFormat::Json => output::output_json(out, &package),
        OutputFormat::Table => {
            writeln!(out, "Package {} delivered", package.package_id)?;
            if let Some(ref proof) = package.proof_of_delivery {
                writeln!(out, "Proof: {}", proof)?;
            }
            Ok(())
        }
    }
}

fn cmd_report<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    kind: ReportArg,
    date: Option<NaiveDate>,
    export: bool,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let table = service.report(ReportKind::from(kind), date)?;
    match format {
        OutputFormat::Json => output::output_json(out, &table)?,
        OutputFormat::Table => output::print_report(out, &table)?,
    }

    if export || output_path.is_some() {
        let path = service.export_report(&table, output_path.as_deref())?;
        // Keep stdout pure JSON in json mode
        match format {
            OutputFormat::Json => eprintln!("Report exported to {}", path.display()),
            OutputFormat::Table => writeln!(out, "\nReport exported to {}", path.display())?,
        }
    }
    Ok(())
}

fn cmd_check_links<W: Write>(
    service: &LogisticsService,
    out: &mut W,
    format: OutputFormat,
    repair: bool,
) -> Result<()> {
    let issues = service.check_links()?;
    let summary = if repair && !issues.is_empty() {
        Some(service.repair_links()?)
    } else {
        None
    };

    match format {
        OutputFormat::Json => {
            output::output_json(out, &json!({ "issues": issues, "repair": summary }))
        }
        OutputFormat::Table => {
            output::print_link_issues(out, &issues)?;
            if let Some(summary) = summary {
                writeln!(
                    out,
                    "Repaired: {} package(s) and {} route(s) updated",
                    summary.packages_updated, summary.routes_updated
                )?;
            } else if !issues.is_empty() {
                writeln!(out, "Run with --repair to fix them.")?;
            }
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_export_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_fuel_rate: Option<f64>,
    set_delay_days: Option<i64>,
    set_strict_storage: Option<bool>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(dir) = set_export_dir {
        config.export_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(rate) = set_fuel_rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::Validation(format!(
                "fuel rate must be zero or more liters, got {}",
                rate
            )));
        }
        config.fuel_liters_per_package = rate;
        modified = true;
    }

    if let Some(days) = set_delay_days {
        if days < 0 {
            return Err(Error::Validation(format!(
                "delay threshold cannot be negative, got {}",
                days
            )));
        }
        config.delay_threshold_days = days;
        modified = true;
    }

    if let Some(strict) = set_strict_storage {
        config.strict_storage = strict;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
