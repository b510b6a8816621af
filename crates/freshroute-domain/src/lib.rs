//! Domain layer: packages, routes, and the operations that link them

pub mod model;
pub mod repository;
pub mod service;
pub mod validation;

pub use model::{Package, PackageStatus, Route, RouteStatus};
pub use repository::{PackageRepository, RouteRepository};
