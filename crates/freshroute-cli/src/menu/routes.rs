//! Route Management menu

use std::io::{BufRead, Write};

use chrono::Local;

use freshroute_app::LogisticsService;
use freshroute_domain::{PackageRepository, RouteRepository};
use freshroute_types::Result;

use super::packages::ask_phone;
use super::{recover, show_menu, success};
use crate::output;
use crate::prompt::Prompter;

const OPTIONS: [&str; 11] = [
    "Create New Route",
    "View All Routes",
    "View Route Details",
    "Assign Package to Route",
    "Remove Package from Route",
    "Change Driver",
    "Mark Route Completed",
    "Delete Route",
    "Find Routes by Date",
    "Find Routes by Driver",
    "Back to Main Menu",
];

pub fn run<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    loop {
        show_menu(p.out(), "Route Management", &OPTIONS)?;
        let result = match p.get_menu_choice(OPTIONS.len() as u32)? {
            1 => create(service, p),
            2 => view_all(service, p),
            3 => details(service, p),
            4 => assign(service, p),
            5 => remove_package(service, p),
            6 => change_driver(service, p),
            7 => complete(service, p),
            8 => delete(service, p),
            9 => by_date(service, p),
            10 => by_driver(service, p),
            _ => return Ok(()),
        };
        recover(p.out(), result)?;
    }
}

fn create<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let next_id = service.routes().next_id()?;
    writeln!(p.out(), "Creating route {}", next_id)?;

    let name = p.get_required("Route name")?;
    let driver = p.get_required("Driver name")?;
    let phone = ask_phone(p, "Driver phone", None)?;
    let date = p.get_date("Date (YYYY-MM-DD)", Some(Local::now().date_naive()))?;

    let route = service.create_route(&name, &driver, &phone, date)?;
    success(p.out(), &format!("Route {} created", route.route_id))
}

fn view_all<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let routes = service.routes().list_all()?;
    output::print_routes_table(p.out(), &routes)
}

fn details<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.find_route(&route_id)?;
    let members = service.route_packages(&route)?;
    output::print_route_details(p.out(), &route, &members)
}

fn assign<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.find_route(&route_id)?;

    let unassigned = service.packages().filter_unassigned()?;
    writeln!(p.out(), "Unassigned packages:")?;
    output::print_packages_table(p.out(), &unassigned)?;

    let package_id = p.get_required("Package ID")?;
    let (package, route) = service.planner().assign(package_id.trim(), &route.route_id)?;
    success(
        p.out(),
        &format!(
            "Package {} assigned to route {} ({} package(s), {:.2} L fuel)",
            package.package_id,
            route.route_id,
            route.package_count(),
            route.estimated_fuel
        ),
    )
}

fn remove_package<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.find_route(&route_id)?;
    let members = service.route_packages(&route)?;
    output::print_packages_table(p.out(), &members)?;

    let package_id = p.get_required("Package ID to remove")?;
    let route = service
        .planner()
        .remove_from_route(&route.route_id, package_id.trim())?;
    success(
        p.out(),
        &format!("Package {} removed from route {}", package_id.trim(), route.route_id),
    )
}

fn change_driver<R: BufRead, W: Write>(
    service: &LogisticsService,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.find_route(&route_id)?;
    writeln!(p.out(), "Current driver: {} ({})", route.driver_name, route.driver_phone)?;

    let driver = p.get_required("New driver name")?;
    let phone = ask_phone(p, "New driver phone", None)?;
    let route = service.planner().change_driver(&route.route_id, &driver, &phone)?;
    success(
        p.out(),
        &format!("Route {} now driven by {}", route.route_id, route.driver_name),
    )
}

fn complete<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.planner().complete_route(route_id.trim())?;
    success(p.out(), &format!("Route {} marked completed", route.route_id))
}

fn delete<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let route_id = p.get_required("Route ID")?;
    let route = service.find_route(&route_id)?;
    writeln!(
        p.out(),
        "Route {} ({}) has {} package(s); they will become unassigned.",
        route.route_id,
        route.route_name,
        route.package_count()
    )?;

    if !p.confirm(&format!("Delete route {}?", route.route_id))? {
        writeln!(p.out(), "Deletion cancelled.")?;
        return Ok(());
    }
    let released = service.planner().delete_route(&route.route_id)?;
    success(
        p.out(),
        &format!("Route {} deleted, {} package(s) released", route.route_id, released),
    )
}

fn by_date<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let date = p.get_date("Date (YYYY-MM-DD)", Some(Local::now().date_naive()))?;
    let routes = service.routes().filter_by_date(date)?;
    output::print_routes_table(p.out(), &routes)
}

fn by_driver<R: BufRead, W: Write>(service: &LogisticsService, p: &mut Prompter<R, W>) -> Result<()> {
    let driver = p.get_required("Driver name")?;
    let routes = service.routes().filter_by_driver(&driver)?;
    output::print_routes_table(p.out(), &routes)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{output, script, service};
    use super::*;
    use chrono::NaiveDate;
    use freshroute_app::NewPackage;
    use freshroute_domain::RouteStatus;

    fn seed(service: &LogisticsService) {
        for name in ["Ana", "Ben"] {
            service
                .register_package(NewPackage {
                    sender: "FreshFarm Co".to_string(),
                    recipient_name: name.to_string(),
                    recipient_address: "45 Mango Ave, Cebu".to_string(),
                    recipient_phone: "09171234567".to_string(),
                    weight: 2.0,
                    category: "Food".to_string(),
                })
                .unwrap();
        }
        service
            .create_route(
                "Cebu North",
                "Juan Dela Cruz",
                "09181234567",
                NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn test_create_route() {
        let (_dir, service) = service();
        let mut p = script(&[
            "1",
            "Cebu South",
            "Maria Santos",
            "0918 765 4321",
            "2025-12-20",
            "11",
        ]);
        run(&service, &mut p).unwrap();

        let route = service.find_route("RT0001").unwrap();
        assert_eq!(route.driver_name, "Maria Santos");
        assert_eq!(route.date, NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
        assert_eq!(route.status, RouteStatus::Active);
    }

    #[test]
    fn test_assign_and_remove() {
        let (_dir, service) = service();
        seed(&service);
        let mut p = script(&[
            "4", "RT0001", "PKG0001", "4", "RT0001", "PKG0002", "5", "RT0001", "PKG0001", "11",
        ]);
        run(&service, &mut p).unwrap();

        let route = service.find_route("RT0001").unwrap();
        assert_eq!(route.package_ids, vec!["PKG0002"]);
        assert_eq!(route.estimated_fuel, 0.5);
        assert!(service.find_package("PKG0001").unwrap().route_id.is_none());
        assert!(output(p).contains("[OK] Package PKG0001 removed from route RT0001"));
    }

    #[test]
    fn test_assign_to_second_route_is_reported() {
        let (_dir, service) = service();
        seed(&service);
        service
            .create_route(
                "Cebu South",
                "Maria",
                "09181234568",
                NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            )
            .unwrap();
        let mut p = script(&["4", "RT0001", "PKG0001", "4", "RT0002", "PKG0001", "11"]);
        run(&service, &mut p).unwrap();

        assert!(output(p).contains("[ERROR] Package PKG0001 is already assigned to route RT0001"));
        assert!(service.find_route("RT0002").unwrap().package_ids.is_empty());
    }

    #[test]
    fn test_delete_route_releases_packages() {
        let (_dir, service) = service();
        seed(&service);
        service.planner().assign("PKG0001", "RT0001").unwrap();
        let mut p = script(&["8", "RT0001", "y", "11"]);
        run(&service, &mut p).unwrap();

        assert_eq!(service.routes().count().unwrap(), 0);
        assert!(service.find_package("PKG0001").unwrap().route_id.is_none());
        assert!(output(p).contains("1 package(s) released"));
    }

    #[test]
    fn test_change_driver_and_find_by_driver() {
        let (_dir, service) = service();
        seed(&service);
        let mut p = script(&["6", "RT0001", "Pedro Reyes", "09191112222", "10", "pedro reyes", "11"]);
        run(&service, &mut p).unwrap();

        assert_eq!(service.find_route("RT0001").unwrap().driver_name, "Pedro Reyes");
        let text = output(p);
        assert!(text.contains("Total: 1 route(s)"));
    }

    #[test]
    fn test_complete_and_find_by_date() {
        let (_dir, service) = service();
        seed(&service);
        let mut p = script(&["7", "RT0001", "9", "2025-12-15", "9", "2025-12-16", "11"]);
        run(&service, &mut p).unwrap();

        assert_eq!(
            service.find_route("RT0001").unwrap().status,
            RouteStatus::Completed
        );
        let text = output(p);
        assert!(text.contains("Total: 1 route(s)"));
        assert!(text.contains("No routes found."));
    }
}
