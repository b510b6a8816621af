//! Domain services

pub mod assignment;
pub mod id_generator;
pub mod link_check;
pub mod reports;
pub mod tracking;

#[cfg(test)]
pub(crate) mod memory;

pub use assignment::DeliveryPlanner;
pub use id_generator::{generate_id, PACKAGE_ID_PREFIX, ROUTE_ID_PREFIX};
pub use link_check::{check_links, repair_links, LinkIssue, RepairSummary};
pub use reports::{ReportKind, ReportOptions, ReportTable};
pub use tracking::{timeline, TimelineEvent, Tracker, TrackingInfo};
