//! Repository trait definitions for data persistence
//!
//! Mutations replace whole records: callers load a value, edit it in memory
//! and hand the complete record back to `update`.

use chrono::NaiveDate;

use freshroute_types::Result;

use crate::model::{Package, PackageStatus, Route};

/// Repository for packages
pub trait PackageRepository {
    /// All packages in insertion order
    fn list_all(&self) -> Result<Vec<Package>>;

    /// Insert a new package; fails with `DuplicateId` if the id is taken
    fn add(&self, package: &Package) -> Result<()>;

    /// Replace an existing package; fails with `NotFound`
    fn update(&self, package: &Package) -> Result<()>;

    /// Remove a package by id; fails with `NotFound`
    fn delete(&self, package_id: &str) -> Result<()>;

    fn get_by_id(&self, package_id: &str) -> Result<Option<Package>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|p| p.package_id == package_id))
    }

    fn filter_by_status(&self, status: PackageStatus) -> Result<Vec<Package>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }

    fn filter_by_route(&self, route_id: &str) -> Result<Vec<Package>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.route_id.as_deref() == Some(route_id))
            .collect())
    }

    fn filter_unassigned(&self) -> Result<Vec<Package>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|p| p.route_id.is_none())
            .collect())
    }
}

/// Repository for delivery routes
pub trait RouteRepository {
    /// All routes in insertion order
    fn list_all(&self) -> Result<Vec<Route>>;

    /// Insert a new route; fails with `DuplicateId` if the id is taken
    fn add(&self, route: &Route) -> Result<()>;

    /// Replace an existing route; fails with `NotFound`
    fn update(&self, route: &Route) -> Result<()>;

    /// Remove a route by id; fails with `NotFound`
    fn delete(&self, route_id: &str) -> Result<()>;

    fn get_by_id(&self, route_id: &str) -> Result<Option<Route>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|r| r.route_id == route_id))
    }

    fn filter_by_date(&self, date: NaiveDate) -> Result<Vec<Route>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| r.date == date)
            .collect())
    }

    /// Case-insensitive exact match on the driver name
    fn filter_by_driver(&self, driver_name: &str) -> Result<Vec<Route>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| r.is_driven_by(driver_name))
            .collect())
    }
}
