//! Delivery status updates and package tracking

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::info;

use freshroute_types::{Error, Result};

use crate::model::{Package, PackageStatus, Route};
use crate::repository::{PackageRepository, RouteRepository};

/// Full tracking view of one package
#[derive(Debug, Clone, Serialize)]
pub struct TrackingInfo {
    pub package: Package,
    pub route: Option<Route>,
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub label: &'static str,
    pub at: DateTime<Local>,
}

/// Chronological timeline of a package's recorded timestamps
pub fn timeline(package: &Package) -> Vec<TimelineEvent> {
    let mut events = vec![TimelineEvent {
        label: "Registered",
        at: package.created_at,
    }];
    if let Some(at) = package.delivered_at {
        events.push(TimelineEvent {
            label: "Delivered",
            at,
        });
    }
    if package.updated_at != package.created_at && Some(package.updated_at) != package.delivered_at {
        events.push(TimelineEvent {
            label: "Last updated",
            at: package.updated_at,
        });
    }
    events.sort_by_key(|e| e.at);
    events
}

/// Status changes on stored packages
pub struct Tracker<'a, P, R> {
    packages: &'a P,
    routes: &'a R,
}

impl<'a, P, R> Tracker<'a, P, R>
where
    P: PackageRepository,
    R: RouteRepository,
{
    pub fn new(packages: &'a P, routes: &'a R) -> Self {
        Self { packages, routes }
    }

    fn load_package(&self, package_id: &str) -> Result<Package> {
        self.packages
            .get_by_id(package_id)?
            .ok_or_else(|| Error::not_found("package", package_id))
    }

    pub fn update_status(&self, package_id: &str, status: PackageStatus) -> Result<Package> {
        let mut package = self.load_package(package_id)?;
        let previous = package.status;
        package.update_status(status);
        self.packages.update(&package)?;
        info!(package_id, from = %previous, to = %status, "status updated");
        Ok(package)
    }

    pub fn mark_delivered(&self, package_id: &str, proof: Option<String>) -> Result<Package> {
        let mut package = self.load_package(package_id)?;
        package.mark_delivered(proof);
        self.packages.update(&package)?;
        info!(package_id, "package delivered");
        Ok(package)
    }

    /// Move every undelivered member of a route to `Out for Delivery`.
    /// Returns how many packages changed.
    pub fn mark_route_out_for_delivery(&self, route_id: &str) -> Result<usize> {
        let route = self
            .routes
            .get_by_id(route_id)?
            .ok_or_else(|| Error::not_found("route", route_id))?;

        let mut changed = 0;
        for package_id in &route.package_ids {
            let Some(mut package) = self.packages.get_by_id(package_id)? else {
                tracing::warn!(route_id, package_id = %package_id, "route lists a missing package");
                continue;
            };
            if package.status == PackageStatus::Pending {
                package.update_status(PackageStatus::OutForDelivery);
                self.packages.update(&package)?;
                changed += 1;
            }
        }

        info!(route_id, changed, "route out for delivery");
        Ok(changed)
    }

    pub fn track(&self, package_id: &str) -> Result<TrackingInfo> {
        let package = self.load_package(package_id)?;
        let route = match package.route_id.as_deref() {
            Some(route_id) => self.routes.get_by_id(route_id)?,
            None => None,
        };
        let timeline = timeline(&package);
        Ok(TrackingInfo {
            package,
            route,
            timeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::memory::{package, route, MemoryRepo};
    use crate::service::DeliveryPlanner;

    #[test]
    fn test_update_status_persists() {
        let packages = MemoryRepo::with(vec![package("P1")]);
        let routes = MemoryRepo::with(vec![route("R1")]);
        let tracker = Tracker::new(&packages, &routes);

        tracker.update_status("P1", PackageStatus::Delivered).unwrap();
        let stored = packages.get_by_id("P1").unwrap().unwrap();
        assert_eq!(stored.status, PackageStatus::Delivered);
        assert!(stored.delivered_at.is_some());
    }

    #[test]
    fn test_update_status_missing_package() {
        let packages = MemoryRepo::with(vec![]);
        let routes = MemoryRepo::with(vec![]);
        let tracker = Tracker::new(&packages, &routes);
        assert!(matches!(
            tracker.update_status("P1", PackageStatus::Pending),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_route_out_for_delivery_skips_delivered() {
        let packages = MemoryRepo::with(vec![package("P1"), package("P2"), package("P3")]);
        let routes = MemoryRepo::with(vec![route("R1")]);
        let planner = DeliveryPlanner::new(&packages, &routes, 0.5);
        for id in ["P1", "P2", "P3"] {
            planner.assign(id, "R1").unwrap();
        }
        let tracker = Tracker::new(&packages, &routes);
        tracker.mark_delivered("P2", None).unwrap();

        assert_eq!(tracker.mark_route_out_for_delivery("R1").unwrap(), 2);
        let delivered = packages.get_by_id("P2").unwrap().unwrap();
        assert_eq!(delivered.status, PackageStatus::Delivered);
        assert_eq!(
            packages
                .filter_by_status(PackageStatus::OutForDelivery)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_track_includes_route() {
        let packages = MemoryRepo::with(vec![package("P1")]);
        let routes = MemoryRepo::with(vec![route("R1")]);
        DeliveryPlanner::new(&packages, &routes, 0.5)
            .assign("P1", "R1")
            .unwrap();

        let info = Tracker::new(&packages, &routes).track("P1").unwrap();
        assert_eq!(info.route.map(|r| r.route_id), Some("R1".to_string()));
        assert_eq!(info.timeline[0].label, "Registered");
    }

    #[test]
    fn test_timeline_is_chronological() {
        let mut p = package("P1");
        p.mark_delivered(Some("signed".to_string()));
        let events = timeline(&p);
        assert_eq!(events.first().map(|e| e.label), Some("Registered"));
        assert!(events.windows(2).all(|w| w[0].at <= w[1].at));
        assert!(events.iter().any(|e| e.label == "Delivered"));
    }
}
