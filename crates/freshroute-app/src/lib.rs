//! Application service layer - use cases, config, store wiring, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;

pub use app::logistics_service::{LogisticsService, NewPackage, PackageEdit};
pub use config::Config;
