//! Logistics Service - use cases shared by the command line and the menus
//!
//! Owns the two stores plus the active configuration and exposes the
//! operations an operator performs: registering and editing packages,
//! creating routes, assignment, tracking, reports, export and link checks.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use freshroute_domain::service::{
    check_links, repair_links, reports, DeliveryPlanner, LinkIssue, RepairSummary, ReportKind,
    ReportTable, Tracker,
};
use freshroute_domain::validation::{validate_package_id, validate_phone, validate_weight};
use freshroute_domain::{Package, PackageRepository, Route, RouteRepository};
use freshroute_store::{PackageStore, RouteStore};
use freshroute_types::{Error, Result};

use crate::config::Config;
use crate::export;
use crate::repository::{open_package_store, open_route_store};

/// Details entered when registering a package
#[derive(Debug, Clone, Default)]
pub struct NewPackage {
    pub sender: String,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: String,
    pub weight: f64,
    pub category: String,
}

/// Field replacements for an existing package; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct PackageEdit {
    pub sender: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_address: Option<String>,
    pub recipient_phone: Option<String>,
    pub weight: Option<f64>,
    pub category: Option<String>,
}

impl PackageEdit {
    pub fn is_empty(&self) -> bool {
        self.sender.is_none()
            && self.recipient_name.is_none()
            && self.recipient_address.is_none()
            && self.recipient_phone.is_none()
            && self.weight.is_none()
            && self.category.is_none()
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn phone(value: &str) -> Result<String> {
    let value = value.trim();
    if !validate_phone(value) {
        return Err(Error::Validation(format!(
            "phone number needs at least 10 digits, got {:?}",
            value
        )));
    }
    Ok(value.to_string())
}

fn category(value: &str) -> String {
    match value.trim() {
        "" => "Other".to_string(),
        v => v.to_string(),
    }
}

pub struct LogisticsService {
    packages: PackageStore,
    routes: RouteStore,
    config: Config,
}

impl LogisticsService {
    /// Open both stores in the configured data directory
    pub fn open(config: Config) -> Result<Self> {
        let packages = open_package_store(&config)?;
        let routes = open_route_store(&config)?;
        debug!(
            packages = %packages.path().display(),
            routes = %routes.path().display(),
            "stores opened"
        );
        Ok(Self::with_stores(packages, routes, config))
    }

    pub fn with_stores(packages: PackageStore, routes: RouteStore, config: Config) -> Self {
        Self {
            packages,
            routes,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn packages(&self) -> &PackageStore {
        &self.packages
    }

    pub fn routes(&self) -> &RouteStore {
        &self.routes
    }

    pub fn planner(&self) -> DeliveryPlanner<'_, PackageStore, RouteStore> {
        DeliveryPlanner::new(
            &self.packages,
            &self.routes,
            self.config.fuel_liters_per_package,
        )
    }

    pub fn tracker(&self) -> Tracker<'_, PackageStore, RouteStore> {
        Tracker::new(&self.packages, &self.routes)
    }

    pub fn find_package(&self, package_id: &str) -> Result<Package> {
        let package_id = package_id.trim();
        if !validate_package_id(package_id) {
            return Err(Error::Validation(format!(
                "invalid package id {:?}",
                package_id
            )));
        }
        self.packages
            .get_by_id(package_id)?
            .ok_or_else(|| Error::not_found("package", package_id))
    }

    pub fn find_route(&self, route_id: &str) -> Result<Route> {
        self.routes
            .get_by_id(route_id.trim())?
            .ok_or_else(|| Error::not_found("route", route_id.trim()))
    }

    /// Validate the details, allocate the next package id and store it
    pub fn register_package(&self, new: NewPackage) -> Result<Package> {
        let recipient_name = required("recipient name", &new.recipient_name)?;
        let recipient_address = required("recipient address", &new.recipient_address)?;
        let recipient_phone = phone(&new.recipient_phone)?;
        let weight = validate_weight(new.weight)?;

        let package = Package::new(
            self.packages.next_id()?,
            new.sender.trim(),
            recipient_name,
            recipient_address,
            recipient_phone,
            weight,
            category(&new.category),
        );
        self.packages.add(&package)?;
        info!(package_id = %package.package_id, "package registered");
        Ok(package)
    }

    pub fn edit_package(&self, package_id: &str, edit: PackageEdit) -> Result<Package> {
        let mut package = self.find_package(package_id)?;
        if edit.is_empty() {
            return Ok(package);
        }

        if let Some(sender) = edit.sender {
            package.sender = sender.trim().to_string();
        }
        if let Some(name) = edit.recipient_name {
            package.recipient_name = required("recipient name", &name)?;
        }
        if let Some(address) = edit.recipient_address {
            package.recipient_address = required("recipient address", &address)?;
        }
        if let Some(number) = edit.recipient_phone {
            package.recipient_phone = phone(&number)?;
        }
        if let Some(weight) = edit.weight {
            package.weight = validate_weight(weight)?;
        }
        if let Some(value) = edit.category {
            package.category = category(&value);
        }

        package.touch();
        self.packages.update(&package)?;
        info!(package_id = %package.package_id, "package edited");
        Ok(package)
    }

    /// Allocate the next route id and store an empty active route
    pub fn create_route(
        &self,
        route_name: &str,
        driver_name: &str,
        driver_phone: &str,
        date: NaiveDate,
    ) -> Result<Route> {
        let route = Route::new(
            self.routes.next_id()?,
            required("route name", route_name)?,
            required("driver name", driver_name)?,
            phone(driver_phone)?,
            date,
        );
        self.routes.add(&route)?;
        info!(route_id = %route.route_id, date = %route.date, "route created");
        Ok(route)
    }

    /// Member packages of a route in route order; ids with no record are skipped
    pub fn route_packages(&self, route: &Route) -> Result<Vec<Package>> {
        let all = self.packages.list_all()?;
        Ok(route
            .package_ids
            .iter()
            .filter_map(|id| all.iter().find(|p| &p.package_id == id).cloned())
            .collect())
    }

    /// Build a report from the current contents of both stores
    pub fn report(&self, kind: ReportKind, date: Option<NaiveDate>) -> Result<ReportTable> {
        let packages = self.packages.list_all()?;
        let routes = self.routes.list_all()?;
        let options = self.config.report_options(date);
        Ok(reports::build(kind, &packages, &routes, &options))
    }

    /// Write a report as CSV, to `output` or the export directory under the
    /// dated default name. Returns the written path.
    pub fn export_report(&self, table: &ReportTable, output: Option<&Path>) -> Result<PathBuf> {
        match output {
            Some(path) => {
                export::export_to_csv(table, path)?;
                Ok(path.to_path_buf())
            }
            None => export::export_to_dir(
                table,
                &self.config.export_dir(),
                Local::now().date_naive(),
            ),
        }
    }

    pub fn check_links(&self) -> Result<Vec<LinkIssue>> {
        let packages = self.packages.list_all()?;
        let routes = self.routes.list_all()?;
        Ok(check_links(&packages, &routes))
    }

    pub fn repair_links(&self) -> Result<RepairSummary> {
        repair_links(
            &self.packages,
            &self.routes,
            self.config.fuel_liters_per_package,
        )
    }
}
