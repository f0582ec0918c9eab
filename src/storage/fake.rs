//! In-memory storage backend for tests.

use crate::error::{PeekError, Result};
use crate::storage::{FileEntry, ObjectStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A bucket's worth of objects held in memory. Listing is sorted by key,
/// which conveniently exercises the selection engine's own re-sort too.
#[derive(Clone, Default)]
pub struct FakeStore {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl FakeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .expect("objects mutex poisoned")
            .insert(key.into(), data.into());
    }
}

impl ObjectStore for FakeStore {
    fn list(&self, prefix: &str) -> Result<Vec<FileEntry>> {
        let objects = self.objects.lock().expect("objects mutex poisoned");
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| FileEntry::new(key.clone(), data.len() as u64))
            .collect())
    }

    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.lock().expect("objects mutex poisoned");
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| PeekError::Storage {
                message: format!("object {key} not found"),
            })
    }
}
