//! Consistency check between package `route_id` fields and route member lists

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::info;

use freshroute_types::Result;

use crate::model::{Package, Route};
use crate::repository::{PackageRepository, RouteRepository};

/// One disagreement between the two sides of a package ↔ route link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkIssue {
    /// Package points at a route that does not exist
    MissingRoute { package_id: String, route_id: String },
    /// Package points at a route that does not list it
    NotListed { package_id: String, route_id: String },
    /// Route lists a package that does not exist
    MissingPackage { route_id: String, package_id: String },
    /// Route lists a package that points elsewhere (or nowhere)
    StrayMember {
        route_id: String,
        package_id: String,
        package_route: Option<String>,
    },
}

impl std::fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkIssue::MissingRoute { package_id, route_id } => {
                write!(f, "{} references missing route {}", package_id, route_id)
            }
            LinkIssue::NotListed { package_id, route_id } => {
                write!(f, "{} references {} but is not listed there", package_id, route_id)
            }
            LinkIssue::MissingPackage { route_id, package_id } => {
                write!(f, "{} lists missing package {}", route_id, package_id)
            }
            LinkIssue::StrayMember {
                route_id,
                package_id,
                package_route,
            } => write!(
                f,
                "{} lists {} which points to {}",
                route_id,
                package_id,
                package_route.as_deref().unwrap_or("no route")
            ),
        }
    }
}

/// Find every link disagreement. Packages are reported before routes.
pub fn check_links(packages: &[Package], routes: &[Route]) -> Vec<LinkIssue> {
    let routes_by_id: HashMap<&str, &Route> =
        routes.iter().map(|r| (r.route_id.as_str(), r)).collect();
    let packages_by_id: HashMap<&str, &Package> =
        packages.iter().map(|p| (p.package_id.as_str(), p)).collect();

    let mut issues = Vec::new();

    for package in packages {
        let Some(route_id) = package.route_id.as_deref() else {
            continue;
        };
        match routes_by_id.get(route_id) {
            None => issues.push(LinkIssue::MissingRoute {
                package_id: package.package_id.clone(),
                route_id: route_id.to_string(),
            }),
            Some(route) if !route.contains(&package.package_id) => {
                issues.push(LinkIssue::NotListed {
                    package_id: package.package_id.clone(),
                    route_id: route_id.to_string(),
                })
            }
            Some(_) => {}
        }
    }

    for route in routes {
        for package_id in &route.package_ids {
            match packages_by_id.get(package_id.as_str()) {
                None => issues.push(LinkIssue::MissingPackage {
                    route_id: route.route_id.clone(),
                    package_id: package_id.clone(),
                }),
                Some(package) if package.route_id.as_deref() != Some(route.route_id.as_str()) => {
                    issues.push(LinkIssue::StrayMember {
                        route_id: route.route_id.clone(),
                        package_id: package_id.clone(),
                        package_route: package.route_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }

    issues
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub issues: usize,
    pub packages_updated: usize,
    pub routes_updated: usize,
}

/// Make route membership agree with package `route_id` fields.
///
/// The package side wins: dangling package references are cleared, routes
/// gain the packages that point at them and lose the ones that do not.
pub fn repair_links<P, R>(packages: &P, routes: &R, fuel_per_package: f64) -> Result<RepairSummary>
where
    P: PackageRepository,
    R: RouteRepository,
{
    let all_packages = packages.list_all()?;
    let all_routes = routes.list_all()?;
    let issues = check_links(&all_packages, &all_routes);

    let mut summary = RepairSummary {
        issues: issues.len(),
        ..Default::default()
    };
    if issues.is_empty() {
        return Ok(summary);
    }

    let route_ids: HashSet<&str> = all_routes.iter().map(|r| r.route_id.as_str()).collect();

    for package in &all_packages {
        if let Some(route_id) = package.route_id.as_deref() {
            if !route_ids.contains(route_id) {
                let mut fixed = package.clone();
                fixed.clear_route();
                packages.update(&fixed)?;
                summary.packages_updated += 1;
            }
        }
    }

    for route in &all_routes {
        let mut fixed = route.clone();
        fixed.package_ids.retain(|id| {
            all_packages
                .iter()
                .any(|p| &p.package_id == id && p.route_id.as_deref() == Some(route.route_id.as_str()))
        });
        for package in &all_packages {
            if package.route_id.as_deref() == Some(route.route_id.as_str()) {
                fixed.add_package(&package.package_id);
            }
        }
        if fixed.package_ids != route.package_ids {
            fixed.recalculate_fuel(fuel_per_package);
            routes.update(&fixed)?;
            summary.routes_updated += 1;
        }
    }

    info!(
        issues = summary.issues,
        packages = summary.packages_updated,
        routes = summary.routes_updated,
        "links repaired"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::memory::{package, route, MemoryRepo};

    fn drifted() -> (Vec<Package>, Vec<Route>) {
        let mut p1 = package("P1");
        p1.route_id = Some("R1".to_string());
        let mut p2 = package("P2");
        p2.route_id = Some("R9".to_string());
        let p3 = package("P3");

        let mut r1 = route("R1");
        r1.package_ids = vec!["P3".to_string(), "P7".to_string()];
        (vec![p1, p2, p3], vec![r1])
    }

    #[test]
    fn test_consistent_links_have_no_issues() {
        let mut p1 = package("P1");
        p1.route_id = Some("R1".to_string());
        let mut r1 = route("R1");
        r1.add_package("P1");
        assert!(check_links(&[p1], &[r1]).is_empty());
    }

    #[test]
    fn test_detects_every_issue_kind() {
        let (packages, routes) = drifted();
        let issues = check_links(&packages, &routes);
        assert_eq!(
            issues,
            vec![
                LinkIssue::NotListed {
                    package_id: "P1".into(),
                    route_id: "R1".into()
                },
                LinkIssue::MissingRoute {
                    package_id: "P2".into(),
                    route_id: "R9".into()
                },
                LinkIssue::StrayMember {
                    route_id: "R1".into(),
                    package_id: "P3".into(),
                    package_route: None
                },
                LinkIssue::MissingPackage {
                    route_id: "R1".into(),
                    package_id: "P7".into()
                },
            ]
        );
    }

    #[test]
    fn test_repair_converges() {
        let (packages, routes) = drifted();
        let packages = MemoryRepo::with(packages);
        let routes = MemoryRepo::with(routes);

        let summary = repair_links(&packages, &routes, 0.5).unwrap();
        assert_eq!(summary.issues, 4);
        assert_eq!(summary.packages_updated, 1);
        assert_eq!(summary.routes_updated, 1);

        let r1 = routes.get_by_id("R1").unwrap().unwrap();
        assert_eq!(r1.package_ids, vec!["P1"]);
        assert!(packages.get_by_id("P2").unwrap().unwrap().route_id.is_none());
        assert!(check_links(&packages.list_all().unwrap(), &routes.list_all().unwrap()).is_empty());
    }
}
