//! Package record and its delivery status

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use freshroute_types::Record;

/// Delivery status of a package
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageStatus {
    #[default]
    Pending,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
}

impl PackageStatus {
    pub const ALL: [PackageStatus; 3] = [
        PackageStatus::Pending,
        PackageStatus::OutForDelivery,
        PackageStatus::Delivered,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PackageStatus::Pending => "Pending",
            PackageStatus::OutForDelivery => "Out for Delivery",
            PackageStatus::Delivered => "Delivered",
        }
    }

    /// Still waiting to reach the recipient
    pub fn is_open(&self) -> bool {
        !matches!(self, PackageStatus::Delivered)
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single shippable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub package_id: String,

    #[serde(default)]
    pub sender: String,

    #[serde(default)]
    pub recipient_name: String,

    #[serde(default)]
    pub recipient_address: String,

    #[serde(default)]
    pub recipient_phone: String,

    /// Weight in kilograms
    #[serde(default)]
    pub weight: f64,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub status: PackageStatus,

    /// Route this package is assigned to (None = unassigned)
    #[serde(default)]
    pub route_id: Option<String>,

    #[serde(default = "Local::now")]
    pub created_at: DateTime<Local>,

    #[serde(default = "Local::now")]
    pub updated_at: DateTime<Local>,

    #[serde(default)]
    pub delivered_at: Option<DateTime<Local>>,

    #[serde(default)]
    pub proof_of_delivery: Option<String>,
}

fn default_category() -> String {
    "Other".to_string()
}

impl Package {
    pub fn new(
        package_id: impl Into<String>,
        sender: impl Into<String>,
        recipient_name: impl Into<String>,
        recipient_address: impl Into<String>,
        recipient_phone: impl Into<String>,
        weight: f64,
        category: impl Into<String>,
    ) -> Self {
        let now = Local::now();
        Self {
            package_id: package_id.into(),
            sender: sender.into(),
            recipient_name: recipient_name.into(),
            recipient_address: recipient_address.into(),
            recipient_phone: recipient_phone.into(),
            weight,
            category: category.into(),
            status: PackageStatus::Pending,
            route_id: None,
            created_at: now,
            updated_at: now,
            delivered_at: None,
            proof_of_delivery: None,
        }
    }

    /// Change status and refresh `updated_at`.
    ///
    /// Entering `Delivered` stamps `delivered_at`. Leaving it keeps the stamp.
    pub fn update_status(&mut self, new_status: PackageStatus) {
        let now = self.next_timestamp();
        if new_status == PackageStatus::Delivered && self.status != PackageStatus::Delivered {
            self.delivered_at = Some(now);
        }
        self.status = new_status;
        self.updated_at = now;
    }

    pub fn mark_delivered(&mut self, proof: Option<String>) {
        self.update_status(PackageStatus::Delivered);
        if proof.is_some() {
            self.proof_of_delivery = proof;
        }
    }

    pub fn assign_route(&mut self, route_id: impl Into<String>) {
        self.route_id = Some(route_id.into());
        self.touch();
    }

    pub fn clear_route(&mut self) {
        self.route_id = None;
        self.touch();
    }

    pub fn is_assigned(&self) -> bool {
        self.route_id.is_some()
    }

    /// Refresh `updated_at` after an edit
    pub fn touch(&mut self) {
        self.updated_at = self.next_timestamp();
    }

    // Local clock can step backwards; never let updated_at precede created_at
    fn next_timestamp(&self) -> DateTime<Local> {
        Local::now().max(self.created_at)
    }
}

impl Record for Package {
    const KIND: &'static str = "package";

    fn record_id(&self) -> &str {
        &self.package_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Package {
        Package::new(
            "PKG0001",
            "Sender Name",
            "Recipient Name",
            "Address Line 1, Address Line 2",
            "09121231212",
            5.5,
            "Others",
        )
    }

    #[test]
    fn test_new_package_is_pending() {
        let package = sample();
        assert_eq!(package.status, PackageStatus::Pending);
        assert!(package.route_id.is_none());
        assert!(package.delivered_at.is_none());
        assert!(package.proof_of_delivery.is_none());
        assert_eq!(package.created_at, package.updated_at);
    }

    #[test]
    fn test_update_status_delivered_sets_timestamp() {
        let mut package = sample();
        package.update_status(PackageStatus::Delivered);
        assert_eq!(package.status, PackageStatus::Delivered);
        assert!(package.delivered_at.is_some());
        assert!(package.updated_at >= package.created_at);
    }

    #[test]
    fn test_back_transition_keeps_delivered_at() {
        let mut package = sample();
        package.update_status(PackageStatus::Delivered);
        let delivered_at = package.delivered_at;

        package.update_status(PackageStatus::Pending);
        assert_eq!(package.status, PackageStatus::Pending);
        assert_eq!(package.delivered_at, delivered_at);
    }

    #[test]
    fn test_repeated_delivered_keeps_first_stamp() {
        let mut package = sample();
        package.update_status(PackageStatus::Delivered);
        let first = package.delivered_at;
        package.update_status(PackageStatus::Delivered);
        assert_eq!(package.delivered_at, first);
    }

    #[test]
    fn test_mark_delivered_with_proof() {
        let mut package = sample();
        package.mark_delivered(Some("left at door".to_string()));
        assert_eq!(package.status, PackageStatus::Delivered);
        assert_eq!(package.proof_of_delivery.as_deref(), Some("left at door"));
    }

    #[test]
    fn test_status_json_labels() {
        let json = serde_json::to_string(&PackageStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"Out for Delivery\"");
        let parsed: PackageStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(parsed, PackageStatus::Delivered);
        assert!(serde_json::from_str::<PackageStatus>("\"Lost\"").is_err());
    }

    #[test]
    fn test_legacy_record_fills_defaults() {
        let json = r#"{"package_id": "PKG0042", "sender": "Ana", "weight": 1.25}"#;
        let package: Package = serde_json::from_str(json).unwrap();
        assert_eq!(package.package_id, "PKG0042");
        assert_eq!(package.status, PackageStatus::Pending);
        assert_eq!(package.category, "Other");
        assert!(package.route_id.is_none());
        assert!(package.delivered_at.is_none());
        assert!(package.updated_at >= package.created_at);
    }
}
