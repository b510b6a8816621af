//! In-memory repositories for service tests

use std::cell::RefCell;

use freshroute_types::{Error, Record, Result};

use crate::model::{Package, Route};
use crate::repository::{PackageRepository, RouteRepository};

pub struct MemoryRepo<T> {
    pub records: RefCell<Vec<T>>,
}

impl<T: Record + Clone> MemoryRepo<T> {
    pub fn with(records: Vec<T>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    fn list(&self) -> Vec<T> {
        self.records.borrow().clone()
    }

    fn insert(&self, record: &T) -> Result<()> {
        let mut records = self.records.borrow_mut();
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(Error::duplicate(T::KIND, record.record_id()));
        }
        records.push(record.clone());
        Ok(())
    }

    fn replace(&self, record: &T) -> Result<()> {
        let mut records = self.records.borrow_mut();
        match records
            .iter_mut()
            .find(|r| r.record_id() == record.record_id())
        {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(Error::not_found(T::KIND, record.record_id())),
        }
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Err(Error::not_found(T::KIND, id));
        }
        Ok(())
    }
}

impl PackageRepository for MemoryRepo<Package> {
    fn list_all(&self) -> Result<Vec<Package>> {
        Ok(self.list())
    }

    fn add(&self, package: &Package) -> Result<()> {
        self.insert(package)
    }

    fn update(&self, package: &Package) -> Result<()> {
        self.replace(package)
    }

    fn delete(&self, package_id: &str) -> Result<()> {
        self.remove(package_id)
    }
}

impl RouteRepository for MemoryRepo<Route> {
    fn list_all(&self) -> Result<Vec<Route>> {
        Ok(self.list())
    }

    fn add(&self, route: &Route) -> Result<()> {
        self.insert(route)
    }

    fn update(&self, route: &Route) -> Result<()> {
        self.replace(route)
    }

    fn delete(&self, route_id: &str) -> Result<()> {
        self.remove(route_id)
    }
}

pub fn package(id: &str) -> Package {
    Package::new(id, "Sender", "Recipient", "12 Harbor St", "0912 345 6789", 2.0, "Food")
}

pub fn route(id: &str) -> Route {
    Route::new(
        id,
        "Harbor Loop",
        "Maria Santos",
        "09111222333",
        chrono::NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
    )
}
