//! Package store backed by `packages.json`

use std::path::{Path, PathBuf};

use freshroute_domain::service::{generate_id, PACKAGE_ID_PREFIX};
use freshroute_domain::{Package, PackageRepository};
use freshroute_types::Result;

use crate::document::{CorruptPolicy, JsonStore};
use crate::PACKAGES_FILE;

/// Persistent store for packages
pub struct PackageStore {
    doc: JsonStore<Package>,
}

impl PackageStore {
    /// Create or open `packages.json` inside `store_dir`
    pub fn open(store_dir: PathBuf, policy: CorruptPolicy) -> Result<Self> {
        let doc = JsonStore::open(store_dir.join(PACKAGES_FILE), policy)?;
        Ok(Self { doc })
    }

    pub fn path(&self) -> &Path {
        self.doc.path()
    }

    pub fn count(&self) -> Result<usize> {
        self.doc.count()
    }

    /// Next free `PKG` id
    pub fn next_id(&self) -> Result<String> {
        let packages = self.doc.read_all()?;
        Ok(generate_id(
            PACKAGE_ID_PREFIX,
            packages.iter().map(|p| p.package_id.as_str()),
        ))
    }
}

impl PackageRepository for PackageStore {
    fn list_all(&self) -> Result<Vec<Package>> {
        self.doc.read_all()
    }

    fn add(&self, package: &Package) -> Result<()> {
        self.doc.insert(package.clone())
    }

    fn update(&self, package: &Package) -> Result<()> {
        self.doc.replace(package.clone())
    }

    fn delete(&self, package_id: &str) -> Result<()> {
        self.doc.remove(package_id).map(|_| ())
    }

    fn get_by_id(&self, package_id: &str) -> Result<Option<Package>> {
        self.doc.get(package_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freshroute_domain::PackageStatus;
    use freshroute_types::Error;
    use std::fs;
    use tempfile::tempdir;

    fn sample(id: &str) -> Package {
        Package::new(
            id,
            "FreshFarm Co",
            "Ana Cruz",
            "45 Mango Ave, Cebu",
            "09171234567",
            5.5,
            "Food",
        )
    }

    #[test]
    fn test_add_and_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
            store.add(&sample("PKG0001")).unwrap();
            store.add(&sample("PKG0002")).unwrap();
        }

        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].package_id, "PKG0001");
        assert_eq!(all[0].weight, 5.5);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.next_id().unwrap(), "PKG0003");
    }

    #[test]
    fn test_get_returns_equal_record() {
        let dir = tempdir().unwrap();
        let mut original = sample("PKG0001");
        original.assign_route("RT0001");
        original.mark_delivered(Some("signed by Ana".to_string()));
        assert!(original.delivered_at.is_some());
        {
            let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
            store.add(&original).unwrap();
            assert_eq!(store.get_by_id("PKG0001").unwrap().unwrap(), original);
        }

        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        assert_eq!(store.get_by_id("PKG0001").unwrap().unwrap(), original);
    }

    #[test]
    fn test_next_id_after_huge_suffix() {
        let dir = tempdir().unwrap();
        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        store.add(&sample("PKG18446744073709551615")).unwrap();

        let next = store.next_id().unwrap();
        assert_eq!(next, "PKG18446744073709551616");
        store.add(&sample(&next)).unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let dir = tempdir().unwrap();
        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        store.add(&sample("PKG0001")).unwrap();
        assert!(matches!(
            store.add(&sample("PKG0001")),
            Err(Error::DuplicateId { kind: "package", .. })
        ));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_update_delete_and_filters() {
        let dir = tempdir().unwrap();
        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        store.add(&sample("PKG0001")).unwrap();
        store.add(&sample("PKG0002")).unwrap();

        let mut p = store.get_by_id("PKG0001").unwrap().unwrap();
        p.assign_route("RT0001");
        p.update_status(PackageStatus::OutForDelivery);
        store.update(&p).unwrap();

        assert_eq!(store.filter_by_route("RT0001").unwrap().len(), 1);
        assert_eq!(store.filter_unassigned().unwrap()[0].package_id, "PKG0002");
        assert_eq!(
            store.filter_by_status(PackageStatus::OutForDelivery).unwrap()[0].package_id,
            "PKG0001"
        );

        store.delete("PKG0001").unwrap();
        assert!(store.get_by_id("PKG0001").unwrap().is_none());
        assert!(matches!(store.delete("PKG0001"), Err(Error::NotFound { .. })));
        assert!(matches!(
            store.update(&sample("PKG0009")),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_reads_records_with_missing_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(PACKAGES_FILE),
            r#"[{"package_id": "PKG0007", "recipient_name": "Old Record"}]"#,
        )
        .unwrap();

        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        let p = store.get_by_id("PKG0007").unwrap().unwrap();
        assert_eq!(p.recipient_name, "Old Record");
        assert_eq!(p.category, "Other");
        assert_eq!(p.status, PackageStatus::Pending);
        assert!(p.route_id.is_none());
        assert_eq!(store.next_id().unwrap(), "PKG0008");
    }

    #[test]
    fn test_status_label_on_disk() {
        let dir = tempdir().unwrap();
        let store = PackageStore::open(dir.path().to_path_buf(), CorruptPolicy::Fail).unwrap();
        let mut p = sample("PKG0001");
        p.update_status(PackageStatus::OutForDelivery);
        store.add(&p).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"Out for Delivery\""));
        assert!(text.contains("\"route_id\": null"));
    }
}
