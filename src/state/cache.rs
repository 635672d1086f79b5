use std::sync::Mutex;

use super::data::Item;
use super::records::RecordStore;
use crate::error::Result;

/// Read-through cache in front of the RecordStore.
///
/// Holds the last `scan()` snapshot until explicitly invalidated. There is
/// no TTL and no background refresh: every mutation path invalidates before
/// returning, so the next `get()` always reflects the mutation
/// (read-your-writes for the single-process deployment).
///
/// The snapshot sits behind a mutex so a multi-threaded host never observes
/// a stale snapshot after an invalidate has completed.
pub struct InventoryCache {
    snapshot: Mutex<Option<Vec<Item>>>,
}

impl InventoryCache {
    pub fn new() -> Self {
        InventoryCache {
            snapshot: Mutex::new(None),
        }
    }

    /// Return the cached snapshot, scanning the store to fill it if empty
    pub fn get(&self, store: &RecordStore) -> Result<Vec<Item>> {
        let mut guard = self.snapshot.lock().unwrap();
        if let Some(items) = guard.as_ref() {
            return Ok(items.clone());
        }
        let items = store.scan()?;
        *guard = Some(items.clone());
        Ok(items)
    }

    /// Drop the cached snapshot. The next `get()` re-scans.
    pub fn invalidate(&self) {
        *self.snapshot.lock().unwrap() = None;
    }
}

impl Default for InventoryCache {
    fn default() -> Self {
        Self::new()
    }
}
