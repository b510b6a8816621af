//! Full delivery flow against file-backed stores

use chrono::NaiveDate;
use tempfile::tempdir;

use freshroute_app::{Config, LogisticsService, NewPackage};
use freshroute_domain::service::ReportKind;
use freshroute_domain::{PackageRepository, PackageStatus, RouteRepository};
use freshroute_types::Error;

fn config_at(dir: &std::path::Path) -> Config {
    Config {
        data_dir: Some(dir.join("data")),
        export_dir: Some(dir.join("exports")),
        ..Config::default()
    }
}

fn food_package() -> NewPackage {
    NewPackage {
        sender: "FreshFarm Co".to_string(),
        recipient_name: "Ana Cruz".to_string(),
        recipient_address: "45 Mango Ave, Cebu".to_string(),
        recipient_phone: "09171234567".to_string(),
        weight: 5.5,
        category: "Food".to_string(),
    }
}

#[test]
fn test_register_assign_deliver() {
    let dir = tempdir().unwrap();
    let service = LogisticsService::open(config_at(dir.path())).unwrap();

    let package = service.register_package(food_package()).unwrap();
    assert_eq!(package.package_id, "PKG0001");
    assert_eq!(package.status, PackageStatus::Pending);
    assert!(package.delivered_at.is_none());

    let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
    let route = service
        .create_route("Cebu North", "Juan Dela Cruz", "09181234567", date)
        .unwrap();
    assert_eq!(route.route_id, "RT0001");

    service.planner().assign("PKG0001", "RT0001").unwrap();
    service
        .tracker()
        .mark_delivered("PKG0001", Some("left at door".to_string()))
        .unwrap();

    // Fresh handles read everything back from disk
    let reopened = LogisticsService::open(config_at(dir.path())).unwrap();
    let stored = reopened.packages().get_by_id("PKG0001").unwrap().unwrap();
    assert_eq!(stored.status, PackageStatus::Delivered);
    assert!(stored.delivered_at.is_some());
    assert_eq!(stored.proof_of_delivery.as_deref(), Some("left at door"));
    assert_eq!(stored.route_id.as_deref(), Some("RT0001"));
    assert_eq!(stored.weight, 5.5);
    assert_eq!(stored.category, "Food");

    let route = reopened.routes().get_by_id("RT0001").unwrap().unwrap();
    assert_eq!(route.package_ids, vec!["PKG0001"]);
    assert!(reopened.check_links().unwrap().is_empty());
}

#[test]
fn test_assign_twice_lists_once() {
    let dir = tempdir().unwrap();
    let service = LogisticsService::open(config_at(dir.path())).unwrap();
    service.register_package(food_package()).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
    service
        .create_route("Cebu North", "Juan", "09181234567", date)
        .unwrap();
    service
        .create_route("Cebu South", "Maria", "09181234568", date)
        .unwrap();

    service.planner().assign("PKG0001", "RT0001").unwrap();
    service.planner().assign("PKG0001", "RT0001").unwrap();
    assert!(matches!(
        service.planner().assign("PKG0001", "RT0002"),
        Err(Error::AlreadyAssigned { .. })
    ));

    let route = service.find_route("RT0001").unwrap();
    assert_eq!(route.package_ids, vec!["PKG0001"]);
    assert!(service.find_route("RT0002").unwrap().package_ids.is_empty());
}

#[test]
fn test_back_transition_keeps_delivery_stamp() {
    let dir = tempdir().unwrap();
    let service = LogisticsService::open(config_at(dir.path())).unwrap();
    service.register_package(food_package()).unwrap();

    let delivered = service
        .tracker()
        .update_status("PKG0001", PackageStatus::Delivered)
        .unwrap();
    let reverted = service
        .tracker()
        .update_status("PKG0001", PackageStatus::Pending)
        .unwrap();
    assert_eq!(reverted.status, PackageStatus::Pending);
    assert_eq!(reverted.delivered_at, delivered.delivered_at);
}

#[test]
fn test_delete_route_releases_packages() {
    let dir = tempdir().unwrap();
    let service = LogisticsService::open(config_at(dir.path())).unwrap();
    service.register_package(food_package()).unwrap();
    service.register_package(food_package()).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap();
    service
        .create_route("Cebu North", "Juan", "09181234567", date)
        .unwrap();
    service.planner().assign("PKG0001", "RT0001").unwrap();
    service.planner().assign("PKG0002", "RT0001").unwrap();

    assert_eq!(service.planner().delete_route("RT0001").unwrap(), 2);
    assert_eq!(service.packages().filter_unassigned().unwrap().len(), 2);
    assert_eq!(service.routes().count().unwrap(), 0);
}

#[test]
fn test_summary_report_and_export() {
    let dir = tempdir().unwrap();
    let service = LogisticsService::open(config_at(dir.path())).unwrap();
    service.register_package(food_package()).unwrap();
    service
        .tracker()
        .mark_delivered("PKG0001", None)
        .unwrap();

    let table = service.report(ReportKind::Summary, None).unwrap();
    assert_eq!(table.headers, vec!["Metric", "Value"]);
    assert!(!table.rows.is_empty());

    let out = dir.path().join("summary.csv");
    let written = service.export_report(&table, Some(&out)).unwrap();
    assert_eq!(written, out);
    let text = std::fs::read_to_string(out).unwrap();
    assert!(text.starts_with("Metric,Value"));
}
