//! Delivery Tracking menu

use std::io::{BufRead, Write};

use freshroute_app::LogisticsService;
use freshroute_domain::{PackageRepository, PackageStatus};
use freshroute_types::Result;

use super::{recover, show_menu, success};
use crate::output;
use crate::prompt::Prompter;

const OPTIONS: [&str; 7] = [
    "Update Package Status",
    "Mark Route Out for Delivery",
    "Mark Package Delivered",
    "View Packages by Status",
    "Track Package",
    "View Delivery Timeline",
    "Back to Main Menu",
];

pub fn run<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        show_menu(p.out(), "Delivery Tracking", &OPTIONS)?;
        let result = match p.get_menu_choice(OPTIONS.len() as u32)? {
            1 => update_status(service, p),
            2 => route_out_for_delivery(service, p),
            3 => mark_delivered(service, p),
            4 => by_status(service, p),
            5 => track(service, p),
            6 => timeline(service, p),
            _ => return Ok(()),
        };
        recover(p.out(), result)?;
    }
}

fn choose_status<R: BufRead, W: Write>(p: &mut Prompter<R, W>, prompt: &str) -> Result<PackageStatus> {
    let labels: Vec<&str> = PackageStatus::ALL.iter().map(|s| s.label()).collect();
    let index = p.get_choice(prompt, &labels)?;
    Ok(PackageStatus::ALL[index])
}

fn update_status<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let package = service.find_package(&package_id)?;
    writeln!(p.out(), "Current status: {}", package.status)?;

    let status = choose_status(p, "New status:")?;
    let package = service.tracker().update_status(&package.package_id, status)?;
    success(
        p.out(),
        &format!("Package {} is now {}", package.package_id, package.status),
    )
}

fn route_out_for_delivery<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let changed = service.tracker().mark_route_out_for_delivery(route_id.trim())?;
    success(
        p.out(),
        &format!("{} package(s) on route {} are out for delivery", changed, route_id.trim()),
    )
}

fn mark_delivered<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let package = service.find_package(&package_id)?;
    let proof = p.get_input("Proof of delivery (e.g. signed by, left at door)", None)?;
    let proof = (!proof.is_empty()).then_some(proof);

    let package = service.tracker().mark_delivered(&package.package_id, proof)?;
    success(p.out(), &format!("Package {} delivered", package.package_id))
}

fn by_status<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let status = choose_status(p, "Show packages with status:")?;
    let packages = service.packages().filter_by_status(status)?;
    output::print_packages_table(p.out(), &packages)
}

fn track<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let info = service.tracker().track(package_id.trim())?;
    output::print_tracking(p.out(), &info)
}

fn timeline<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let package_id = p.get_required("Package ID")?;
    let package = service.find_package(&package_id)?;
    output::print_timeline(p.out(), &package)
}
