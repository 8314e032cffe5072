//! Key-value capability the coupon store persists through
use super::error::StoreError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-process storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Durable storage on a sled database.
///
/// Sled holds a file lock on its directory, so a second process opening the same
/// path fails instead of sharing it. Within one process every clone of the `Db`
/// handle sees the same data.
pub struct SledStorage {
    instance: Arc<sled::Db>,
}

impl SledStorage {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }
}

impl KeyValueStore for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        // bytes that are not utf-8 come back mangled and fail later as corrupt json
        let value = self.instance.get(key.as_bytes())?;
        Ok(value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.instance.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_returns_what_was_set() {
        let storage = MemoryStorage::new();

        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn sled_storage_survives_reopen() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("storage_reopen.db");

        {
            let db = Arc::new(sled::open(&db_path)?);
            let storage = SledStorage::new(db.clone());
            storage.set("marketing-coupons", "{}")?;
            db.flush()?;
        }

        let storage = SledStorage::new(Arc::new(sled::open(&db_path)?));
        assert_eq!(storage.get("marketing-coupons")?.as_deref(), Some("{}"));

        Ok(())
    }

    #[test]
    fn sled_storage_reads_invalid_utf8_lossily() -> anyhow::Result<()> {
        let temp_dir = tempdir()?;
        let db = Arc::new(sled::open(temp_dir.path().join("lossy.db"))?);
        db.insert("k", &[0xff, 0xfe, b'x'][..])?;

        let storage = SledStorage::new(db);
        let value = storage.get("k")?.unwrap();

        assert!(value.ends_with('x'));
        Ok(())
    }
}
