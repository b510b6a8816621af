//! Route store backed by `routes.json`

use std::path::{Path, PathBuf};

use freshroute_domain::service::{generate_id, ROUTE_ID_PREFIX};
use freshroute_domain::{Route, RouteRepository};
use freshroute_types::Result;

use crate::document::{CorruptPolicy, JsonStore};
use crate::ROUTES_FILE;

/// Persistent store for delivery routes
pub struct RouteStore {
    doc: JsonStore<Route>,
}

impl RouteStore {
    /// Create or open `routes.json` inside `store_dir`
    pub fn open(store_dir: PathBuf, policy: CorruptPolicy) -> Result<Self> {
        let doc = JsonStore::open(store_dir.join(ROUTES_FILE), policy)?;
        Ok(Self { doc })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn count(&self) -> Result<usize> {
        self.doc.count()
    }

    /// Next free `RT` id
    pub fn next_id(&self) -> Result<String> {
        let routes = self.doc.read_all()?;
        Ok(generate_id(
            ROUTE_ID_PREFIX,
            routes.iter().map(|r| r.route_id.as_str()),
        ))
    }
}

impl RouteRepository for RouteStore {
    fn list_all(&self) -> Result<Vec<Route>> {
        self.doc.read_all()
    }

    fn add(&self, route: &Route) -> Result<()> {
        self.doc.insert(route.clone())
    }

    fn update(&self, route: &Route) -> Result<()> {
        self.doc.replace(route.clone())
    }

    fn delete(&self, route_id: &str) -> Result<()> {
        self.doc.remove(route_id).map(|_| ())
    }

    fn get_by_id(&self, route_id: &str) -> Result<Option<Route>> {
        self.doc.get(route_id)
    }
}
