//! Report builders
//!
//! Every report is computed from in-memory snapshots of both collections
//! and returned as a `ReportTable`, which the CLI prints and the app layer
//! exports to CSV.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

use crate::model::{Package, PackageStatus, Route, RouteStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Delivered,
    Drivers,
    Delayed,
    Fuel,
    Addresses,
    Summary,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Delivered,
        ReportKind::Drivers,
        ReportKind::Delayed,
        ReportKind::Fuel,
        ReportKind::Addresses,
        ReportKind::Summary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Delivered => "Packages Delivered per Day",
            ReportKind::Drivers => "Driver Performance Report",
            ReportKind::Delayed => "Delayed Deliveries Report",
            ReportKind::Fuel => "Fuel Usage Estimates",
            ReportKind::Addresses => "Problematic Addresses Report",
            ReportKind::Summary => "Summary Statistics",
        }
    }

    /// File-name stem for exports
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Delivered => "delivered_packages",
            ReportKind::Drivers => "driver_performance",
            ReportKind::Delayed => "delayed_deliveries",
            ReportKind::Fuel => "fuel_usage",
            ReportKind::Addresses => "problematic_addresses",
            ReportKind::Summary => "summary_statistics",
        }
    }
}

/// Inputs that are not part of the stored data
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Day for the delivered-per-day report
    pub date: NaiveDate,
    /// Reference time for ages
    pub now: DateTime<Local>,
    /// Minimum age in whole days for a delivery to count as delayed
    pub delay_threshold_days: i64,
    /// Minimum undelivered packages for an address to be listed
    pub problem_address_min_packages: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        let now = Local::now();
        Self {
            date: now.date_naive(),
            now,
            delay_threshold_days: 0,
            problem_address_min_packages: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub kind: ReportKind,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Totals shown under the table (label, value)
    pub summary: Vec<(String, String)>,
}

impl ReportTable {
    fn new(kind: ReportKind, headers: &[&str]) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            summary: Vec::new(),
        }
    }

    fn push_summary(&mut self, label: &str, value: impl ToString) {
        self.summary.push((label.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn build(
    kind: ReportKind,
    packages: &[Package],
    routes: &[Route],
    options: &ReportOptions,
) -> ReportTable {
    match kind {
        ReportKind::Delivered => delivered_on(packages, options.date),
        ReportKind::Drivers => driver_performance(routes, packages),
        ReportKind::Delayed => {
            delayed_deliveries(packages, options.now, options.delay_threshold_days)
        }
        ReportKind::Fuel => fuel_usage(routes),
        ReportKind::Addresses => {
            problematic_addresses(packages, options.problem_address_min_packages)
        }
        ReportKind::Summary => summary_statistics(packages, routes),
    }
}

fn format_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Packages whose delivery falls on `date` (local calendar day)
pub fn delivered_on(packages: &[Package], date: NaiveDate) -> ReportTable {
    let mut table = ReportTable::new(
        ReportKind::Delivered,
        &[
            "Package ID",
            "Recipient",
            "Address",
            "Weight (kg)",
            "Category",
            "Delivered At",
            "Proof of Delivery",
        ],
    );
    table.title = format!("{} ({})", table.title, date.format("%Y-%m-%d"));

    let mut delivered: Vec<(&Package, DateTime<Local>)> = packages
        .iter()
        .filter(|p| p.status == PackageStatus::Delivered)
        .filter_map(|p| p.delivered_at.map(|at| (p, at)))
        .filter(|(_, at)| at.date_naive() == date)
        .collect();
    delivered.sort_by_key(|(_, at)| *at);

    let total_weight: f64 = delivered.iter().map(|(p, _)| p.weight).sum();
    for (package, at) in &delivered {
        table.rows.push(vec![
            package.package_id.clone(),
            package.recipient_name.clone(),
            package.recipient_address.clone(),
            format!("{:.2}", package.weight),
            package.category.clone(),
            format_stamp(at),
            package.proof_of_delivery.clone().unwrap_or_default(),
        ]);
    }

    table.push_summary("Packages delivered", delivered.len());
    table.push_summary("Total weight (kg)", format!("{:.2}", total_weight));
    table
}

#[derive(Debug, Default)]
struct DriverTally {
    routes: usize,
    assigned: usize,
    delivered: usize,
}

/// Per-driver totals across all of their routes
pub fn driver_performance(routes: &[Route], packages: &[Package]) -> ReportTable {
    let mut table = ReportTable::new(
        ReportKind::Drivers,
        &["Driver", "Routes", "Assigned", "Delivered", "Success Rate (%)"],
    );

    let status_by_id: HashMap<&str, PackageStatus> = packages
        .iter()
        .map(|p| (p.package_id.as_str(), p.status))
        .collect();

    let mut tallies: BTreeMap<String, DriverTally> = BTreeMap::new();
    for route in routes {
        let name = route.driver_name.trim();
        let name = if name.is_empty() { "(no driver)" } else { name };
        let tally = tallies.entry(name.to_string()).or_default();
        tally.routes += 1;
        tally.assigned += route.package_ids.len();
        tally.delivered += route
            .package_ids
            .iter()
            .filter(|id| status_by_id.get(id.as_str()) == Some(&PackageStatus::Delivered))
            .count();
    }

    for (driver, tally) in &tallies {
        table.rows.push(vec![
            driver.clone(),
            tally.routes.to_string(),
            tally.assigned.to_string(),
            tally.delivered.to_string(),
            format!("{:.1}", percent(tally.delivered, tally.assigned)),
        ]);
    }

    let assigned: usize = tallies.values().map(|t| t.assigned).sum();
    let delivered: usize = tallies.values().map(|t| t.delivered).sum();
    table.push_summary("Drivers", tallies.len());
    table.push_summary("Overall success rate (%)", format!("{:.1}", percent(delivered, assigned)));
    table
}

/// Undelivered packages at least `threshold_days` old, oldest first
pub fn delayed_deliveries(
    packages: &[Package],
    now: DateTime<Local>,
    threshold_days: i64,
) -> ReportTable {
    let mut table = ReportTable::new(
        ReportKind::Delayed,
        &[
            "Package ID",
            "Recipient",
            "Address",
            "Status",
            "Created At",
            "Days Pending",
        ],
    );

    let mut delayed: Vec<(&Package, i64)> = packages
        .iter()
        .filter(|p| p.status.is_open())
        .map(|p| (p, (now - p.created_at).num_days().max(0)))
        .filter(|(_, days)| *days >= threshold_days)
        .collect();
    delayed.sort_by_key(|(p, _)| p.created_at);

    for (package, days) in &delayed {
        table.rows.push(vec![
            package.package_id.clone(),
            package.recipient_name.clone(),
            package.recipient_address.clone(),
            package.status.label().to_string(),
            format_stamp(&package.created_at),
            days.to_string(),
        ]);
    }

    table.push_summary("Delayed packages", delayed.len());
    if let Some((_, oldest)) = delayed.iter().max_by_key(|(_, days)| *days) {
        table.push_summary("Longest wait (days)", oldest);
    }
    table
}

/// Estimated fuel per route and in total
pub fn fuel_usage(routes: &[Route]) -> ReportTable {
    let mut table = ReportTable::new(
        ReportKind::Fuel,
        &[
            "Route ID",
            "Route Name",
            "Driver",
            "Date",
            "Packages",
            "Estimated Fuel (L)",
        ],
    );

    let mut sorted: Vec<&Route> = routes.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.route_id.cmp(&b.route_id)));

    for route in &sorted {
        table.rows.push(vec![
            route.route_id.clone(),
            route.route_name.clone(),
            route.driver_name.clone(),
            route.date.format("%Y-%m-%d").to_string(),
            route.package_count().to_string(),
            format!("{:.2}", route.estimated_fuel),
        ]);
    }

    let total: f64 = routes.iter().map(|r| r.estimated_fuel).sum();
    table.push_summary("Routes", routes.len());
    table.push_summary("Total fuel (L)", format!("{:.2}", total));
    table
}

/// Trimmed, case-folded, single-spaced form used to group addresses
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Addresses that have piled up `min_undelivered` or more open deliveries
pub fn problematic_addresses(packages: &[Package], min_undelivered: usize) -> ReportTable {
    let mut table = ReportTable::new(
        ReportKind::Addresses,
        &["Address", "Undelivered", "Total Packages", "Package IDs"],
    );

    struct Group<'p> {
        display: &'p str,
        total: usize,
        open: Vec<&'p str>,
    }

    let mut groups: BTreeMap<String, Group<'_>> = BTreeMap::new();
    for package in packages {
        let key = normalize_address(&package.recipient_address);
        if key.is_empty() {
            continue;
        }
        let group = groups.entry(key).or_insert_with(|| Group {
            display: package.recipient_address.trim(),
            total: 0,
            open: Vec::new(),
        });
        group.total += 1;
        if package.status.is_open() {
            group.open.push(&package.package_id);
        }
    }

    let mut flagged: Vec<&Group<'_>> = groups
        .values()
        .filter(|g| g.open.len() >= min_undelivered.max(1))
        .collect();
    flagged.sort_by(|a, b| b.open.len().cmp(&a.open.len()));

    for group in &flagged {
        table.rows.push(vec![
            group.display.to_string(),
            group.open.len().to_string(),
            group.total.to_string(),
            group.open.join(" "),
        ]);
    }

    table.push_summary("Problematic addresses", flagged.len());
    table
}

/// Overall counts across both collections
pub fn summary_statistics(packages: &[Package], routes: &[Route]) -> ReportTable {
    let mut table = ReportTable::new(ReportKind::Summary, &["Metric", "Value"]);

    let count_status = |status: PackageStatus| packages.iter().filter(|p| p.status == status).count();
    let delivered = count_status(PackageStatus::Delivered);
    let unassigned = packages.iter().filter(|p| !p.is_assigned()).count();
    let active = routes.iter().filter(|r| r.status == RouteStatus::Active).count();
    let assigned_slots: usize = routes.iter().map(|r| r.package_count()).sum();
    let average = if routes.is_empty() {
        0.0
    } else {
        assigned_slots as f64 / routes.len() as f64
    };
    let total_weight: f64 = packages.iter().map(|p| p.weight).sum();

    let rows: Vec<(&str, String)> = vec![
        ("Total packages", packages.len().to_string()),
        ("Pending", count_status(PackageStatus::Pending).to_string()),
        (
            "Out for Delivery",
            count_status(PackageStatus::OutForDelivery).to_string(),
        ),
        ("Delivered", delivered.to_string()),
        ("Unassigned packages", unassigned.to_string()),
        ("Total weight (kg)", format!("{:.2}", total_weight)),
        ("Total routes", routes.len().to_string()),
        ("Active routes", active.to_string()),
        ("Completed routes", (routes.len() - active).to_string()),
        (
            "Delivery completion rate (%)",
            format!("{:.1}", percent(delivered, packages.len())),
        ),
        ("Average packages per route", format!("{:.2}", average)),
    ];

    table.rows = rows
        .into_iter()
        .map(|(metric, value)| vec![metric.to_string(), value])
        .collect();
    table
}
