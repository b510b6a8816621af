//! Package ↔ route linking
//!
//! Each side of a link lives in its own document, so every operation here
//! issues two independent writes. A failure between them leaves the link
//! half-updated; `link_check` finds and repairs that.

use tracing::{debug, info, warn};

use freshroute_types::{Error, Result};

use crate::model::{Package, Route};
use crate::repository::{PackageRepository, RouteRepository};

/// Coordinates package and route records held by two separate repositories
pub struct DeliveryPlanner<'a, P, R> {
    packages: &'a P,
    routes: &'a R,
    fuel_per_package: f64,
}

impl<'a, P, R> DeliveryPlanner<'a, P, R>
where
    P: PackageRepository,
    R: RouteRepository,
{
    pub fn new(packages: &'a P, routes: &'a R, fuel_per_package: f64) -> Self {
        Self {
            packages,
            routes,
            fuel_per_package,
        }
    }

    fn load_package(&self, package_id: &str) -> Result<Package> {
        self.packages
            .get_by_id(package_id)?
            .ok_or_else(|| Error::not_found("package", package_id))
    }

    fn load_route(&self, route_id: &str) -> Result<Route> {
        self.routes
            .get_by_id(route_id)?
            .ok_or_else(|| Error::not_found("route", route_id))
    }

    /// Link an unassigned package to a route.
    ///
    /// Repeating the call for the same pair is a no-op apart from rewriting
    /// both records. A package already on another route is refused.
    pub fn assign(&self, package_id: &str, route_id: &str) -> Result<(Package, Route)> {
        let mut package = self.load_package(package_id)?;
        let mut route = self.load_route(route_id)?;

        match package.route_id.clone() {
            Some(current) if current != route_id => {
                return Err(Error::AlreadyAssigned {
                    package_id: package_id.to_string(),
                    route_id: current,
                });
            }
            Some(_) => debug!(package_id, route_id, "package already on route"),
            None => package.assign_route(route_id),
        }

        if !route.add_package(package_id) {
            debug!(package_id, route_id, "route already lists package");
        }
        route.recalculate_fuel(self.fuel_per_package);

        self.packages.update(&package)?;
        self.routes.update(&route)?;
        info!(package_id, route_id, "package assigned");
        Ok((package, route))
    }

    /// Detach a package from whatever route it points to
    pub fn unassign(&self, package_id: &str) -> Result<Package> {
        let mut package = self.load_package(package_id)?;
        let Some(route_id) = package.route_id.clone() else {
            return Ok(package);
        };

        package.clear_route();
        self.packages.update(&package)?;

        match self.routes.get_by_id(&route_id)? {
            Some(mut route) => {
                route.remove_package(package_id);
                route.recalculate_fuel(self.fuel_per_package);
                self.routes.update(&route)?;
            }
            None => warn!(package_id, route_id = %route_id, "package pointed at a missing route"),
        }

        info!(package_id, route_id = %route_id, "package unassigned");
        Ok(package)
    }

    /// Remove a package from a specific route's member list as well as
    /// clearing the package side when it points there
    pub fn remove_from_route(&self, route_id: &str, package_id: &str) -> Result<Route> {
        let mut route = self.load_route(route_id)?;
        if !route.remove_package(package_id) {
            return Err(Error::Validation(format!(
                "package {} is not on route {}",
                package_id, route_id
            )));
        }
        route.recalculate_fuel(self.fuel_per_package);
        self.routes.update(&route)?;

        if let Some(mut package) = self.packages.get_by_id(package_id)? {
            if package.route_id.as_deref() == Some(route_id) {
                package.clear_route();
                self.packages.update(&package)?;
            }
        }
        Ok(route)
    }

    /// Delete a route, releasing its packages first. Returns how many
    /// packages were released.
    pub fn delete_route(&self, route_id: &str) -> Result<usize> {
        let route = self.load_route(route_id)?;

        let mut released = 0;
        for mut package in self.packages.filter_by_route(&route.route_id)? {
            package.clear_route();
            self.packages.update(&package)?;
            released += 1;
        }

        self.routes.delete(route_id)?;
        info!(route_id, released, "route deleted");
        Ok(released)
    }

    /// Delete a package, unlinking it from its route first
    pub fn delete_package(&self, package_id: &str) -> Result<()> {
        let package = self.unassign(package_id)?;
        self.packages.delete(&package.package_id)?;
        info!(package_id, "package deleted");
        Ok(())
    }

    pub fn change_driver(&self, route_id: &str, driver_name: &str, driver_phone: &str) -> Result<Route> {
        let mut route = self.load_route(route_id)?;
        route.driver_name = driver_name.to_string();
        route.driver_phone = driver_phone.to_string();
        self.routes.update(&route)?;
        Ok(route)
    }

    pub fn complete_route(&self, route_id: &str) -> Result<Route> {
        let mut route = self.load_route(route_id)?;
        route.mark_completed();
        self.routes.update(&route)?;
        Ok(route)
    }
}
