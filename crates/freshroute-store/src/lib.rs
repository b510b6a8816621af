//! Persistent stores for packages and routes
//!
//! Each collection lives in its own JSON array document. Every operation
//! reads the whole document, and every mutation rewrites it.

mod document;
mod packages;
mod routes;

pub use document::{CorruptPolicy, JsonStore};
pub use packages::PackageStore;
pub use routes::RouteStore;

pub const PACKAGES_FILE: &str = "packages.json";
pub const ROUTES_FILE: &str = "routes.json";
