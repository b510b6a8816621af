//! Domain model types

pub mod package;
pub mod route;

pub use package::{Package, PackageStatus};
pub use route::{Route, RouteStatus};
