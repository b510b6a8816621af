//! Whole-file JSON array document

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use freshroute_types::{Error, Record, Result, StorageError};

/// What to do when the document on disk is not valid JSON
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CorruptPolicy {
    /// Warn, keep a timestamped `.corrupt` copy of the file, and continue with an empty collection
    #[default]
    Tolerate,
    /// Return `StorageError::Corrupt`
    Fail,
}

/// A collection of records persisted as one pretty-printed JSON array
pub struct JsonStore<T> {
    path: PathBuf,
    policy: CorruptPolicy,
    _record: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Open a document, creating its directory and an empty array if missing
    pub fn open(path: PathBuf, policy: CorruptPolicy) -> Result<Self> {
        let store = Self {
            path,
            policy,
            _record: PhantomData,
        };
        fs::create_dir_all(store.dir())?;
        if !store.path.exists() {
            store.write_all(&[])?;
            debug!(path = %store.path.display(), "created empty document");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Save damaged `content` as `<name>.<YYYYmmddHHMMSS>.corrupt`.
    ///
    /// Returns `None` when an earlier copy already holds the same bytes.
    fn keep_corrupt_copy(&self, content: &str) -> std::io::Result<Option<PathBuf>> {
        let name = self.file_name();
        let prefix = format!("{}.", name);
        for entry in fs::read_dir(self.dir())? {
            let entry = entry?;
            let entry_name = entry.file_name().to_string_lossy().into_owned();
            if entry_name.starts_with(&prefix)
                && entry_name.ends_with(".corrupt")
                && fs::read(entry.path())? == content.as_bytes()
            {
                return Ok(None);
            }
        }

        let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
        let mut copy = self.dir().join(format!("{}.{}.corrupt", name, stamp));
        let mut n = 1;
        while copy.exists() {
            copy = self.dir().join(format!("{}.{}-{}.corrupt", name, stamp, n));
            n += 1;
        }
        fs::write(&copy, content)?;
        Ok(Some(copy))
    }

    /// Parse every record in the document, in stored order
    pub fn read_all(&self) -> Result<Vec<T>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut content = String::new();
        BufReader::new(file).read_to_string(&mut content)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(records) => Ok(records),
            Err(e) => self.on_corrupt(&content, e),
        }
    }

    fn on_corrupt(&self, content: &str, err: serde_json::Error) -> Result<Vec<T>> {
        match self.policy {
            CorruptPolicy::Fail => Err(StorageError::Corrupt {
                path: self.path.clone(),
                reason: err.to_string(),
            }
            .into()),
            CorruptPolicy::Tolerate => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "document is not valid JSON, treating it as empty"
                );
                match self.keep_corrupt_copy(content) {
                    Ok(Some(copy)) => warn!(copy = %copy.display(), "kept corrupt copy"),
                    Ok(None) => debug!(path = %self.path.display(), "corrupt copy already kept"),
                    Err(e) => warn!(path = %self.path.display(), error = %e, "could not keep corrupt copy"),
                }
                Ok(Vec::new())
            }
        }
    }

    /// Replace the document with `records`.
    ///
    /// Data goes to a temporary file in the same directory which is then
    /// renamed over the document, so readers see either the old or the new
    /// contents.
    pub fn write_all(&self, records: &[T]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.clone(),
            reason: e.error.to_string(),
        })?;
        debug!(path = %self.path.display(), records = records.len(), "document written");
        Ok(())
    }

    /// Read, apply `f`, write back. Nothing is written if `f` fails.
    pub fn mutate<F, O>(&self, f: F) -> Result<O>
    where
        F: FnOnce(&mut Vec<T>) -> Result<O>,
    {
        let mut records = self.read_all()?;
        let out = f(&mut records)?;
        self.write_all(&records)?;
        Ok(out)
    }

    pub fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self.read_all()?.into_iter().find(|r| r.record_id() == id))
    }

    pub fn insert(&self, record: T) -> Result<()> {
        self.mutate(|records| {
            if records.iter().any(|r| r.record_id() == record.record_id()) {
                return Err(Error::duplicate(T::KIND, record.record_id()));
            }
            records.push(record);
            Ok(())
        })
    }

    pub fn replace(&self, record: T) -> Result<()> {
        self.mutate(|records| {
            let slot = records
                .iter_mut()
                .find(|r| r.record_id() == record.record_id())
                .ok_or_else(|| Error::not_found(T::KIND, record.record_id()))?;
            *slot = record;
            Ok(())
        })
    }

    pub fn remove(&self, id: &str) -> Result<T> {
        self.mutate(|records| {
            let index = records
                .iter()
                .position(|r| r.record_id() == id)
                .ok_or_else(|| Error::not_found(T::KIND, id))?;
            Ok(records.remove(index))
        })
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }
}
