//! Repository adapters for persistence layer

use freshroute_store::{PackageStore, RouteStore};
use freshroute_types::Result;

use crate::config::Config;

/// Open the package store in the configured data directory
pub fn open_package_store(config: &Config) -> Result<PackageStore> {
    let store_dir = config.data_dir()?;
    PackageStore::open(store_dir, config.corrupt_policy())
}

/// Open the route store in the configured data directory
pub fn open_route_store(config: &Config) -> Result<RouteStore> {
    let store_dir = config.data_dir()?;
    RouteStore::open(store_dir, config.corrupt_policy())
}
