//! Delivery route record

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use freshroute_types::Record;

/// Litres of fuel budgeted per package when no rate is configured
pub const DEFAULT_FUEL_PER_PACKAGE: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteStatus {
    #[default]
    Active,
    Completed,
}

impl RouteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Active => "Active",
            RouteStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A named, driver-assigned group of packages scheduled for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,

    #[serde(default)]
    pub route_name: String,

    #[serde(default)]
    pub driver_name: String,

    #[serde(default)]
    pub driver_phone: String,

    /// Scheduled date (YYYY-MM-DD)
    #[serde(default = "today")]
    pub date: NaiveDate,

    /// Member packages in insertion order, no duplicates
    #[serde(default)]
    pub package_ids: Vec<String>,

    #[serde(default)]
    pub status: RouteStatus,

    #[serde(default = "Local::now")]
    pub created_at: DateTime<Local>,

    /// Estimated fuel usage in litres
    #[serde(default)]
    pub estimated_fuel: f64,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Route {
    pub fn new(
        route_id: impl Into<String>,
        route_name: impl Into<String>,
        driver_name: impl Into<String>,
        driver_phone: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            route_id: route_id.into(),
            route_name: route_name.into(),
            driver_name: driver_name.into(),
            driver_phone: driver_phone.into(),
            date,
            package_ids: Vec::new(),
            status: RouteStatus::Active,
            created_at: Local::now(),
            estimated_fuel: 0.0,
        }
    }

    /// Append a package id. Returns false if it is already a member.
    pub fn add_package(&mut self, package_id: &str) -> bool {
        if self.contains(package_id) {
            return false;
        }
        self.package_ids.push(package_id.to_string());
        true
    }

    /// Remove a package id. Returns false if it was not a member.
    pub fn remove_package(&mut self, package_id: &str) -> bool {
        let before = self.package_ids.len();
        self.package_ids.retain(|id| id != package_id);
        self.package_ids.len() != before
    }

    pub fn contains(&self, package_id: &str) -> bool {
        self.package_ids.iter().any(|id| id == package_id)
    }

    pub fn package_count(&self) -> usize {
        self.package_ids.len()
    }

    /// Re-derive `estimated_fuel` from the package count
    pub fn recalculate_fuel(&mut self, liters_per_package: f64) {
        self.estimated_fuel = (self.package_ids.len() as f64 * liters_per_package).max(0.0);
    }

    pub fn mark_completed(&mut self) {
        self.status = RouteStatus::Completed;
    }

    /// Case-insensitive exact match on the driver name
    pub fn is_driven_by(&self, name: &str) -> bool {
        self.driver_name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

impl Record for Route {
    const KIND: &'static str = "route";

    fn record_id(&self) -> &str {
        &self.route_id
    }
}
