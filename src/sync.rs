/// Sync orchestrator: the single entry point for mutating the inventory.
///
/// Adding an item is a lightweight saga with two explicit phases:
/// `commit_local` writes the blob and the record so the item is immediately
/// usable, then `mirror_and_patch` attempts the remote upload and rewrites
/// the photo reference on success. Phase two failing never unwinds phase
/// one; it surfaces as a warning on an otherwise successful Add.
use std::path::PathBuf;

use chrono::Utc;

use crate::error::{InventoryError, Result};
use crate::photo::mirror::MirrorClient;
use crate::photo::store::BlobStore;
use crate::state::cache::InventoryCache;
use crate::state::data::{AgeRange, Category, Item, NewItem, PhotoSource};
use crate::state::data::is_remote_reference;
use crate::state::records::RecordStore;

/// Outcome of a successful Add. `mirror_warning` is set when the item was
/// stored but its photo could not be (or was not) mirrored remotely.
#[derive(Debug)]
pub struct AddReport {
    pub id: i64,
    pub photo_reference: String,
    pub mirror_warning: Option<String>,
}

/// Where an item's photo can currently be fetched from.
/// `Missing` is the renderable sentinel for a reference that no longer
/// resolves; callers show a placeholder instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoLocation {
    Remote(String),
    Local(PathBuf),
    Missing,
}

/// Read-side filter over the inventory. Empty axis = match everything
/// on that axis; the description match is case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub categories: Vec<Category>,
    pub age_ranges: Vec<AgeRange>,
    pub description_contains: Option<String>,
}

impl ItemFilter {
    fn matches(&self, item: &Item) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&item.category) {
            return false;
        }
        if !self.age_ranges.is_empty() && !self.age_ranges.contains(&item.age_range) {
            return false;
        }
        if let Some(needle) = &self.description_contains {
            if !item
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Owns every piece of inventory state: the record store, its cache, the
/// local blob store, and (optionally) the remote mirror client. One
/// Inventory per process; construct it explicitly and `close` it on the
/// way out rather than leaning on ambient globals.
pub struct Inventory {
    records: RecordStore,
    cache: InventoryCache,
    blobs: BlobStore,
    mirror: Option<MirrorClient>,
}

impl Inventory {
    pub fn new(records: RecordStore, blobs: BlobStore, mirror: Option<MirrorClient>) -> Self {
        Inventory {
            records,
            cache: InventoryCache::new(),
            blobs,
            mirror,
        }
    }

    pub fn blob_store(&self) -> &BlobStore {
        &self.blobs
    }

    /// Add an item with its photo.
    ///
    /// The local blob write and record insert are mandatory; the remote
    /// mirror attempt is best-effort. A mirror failure is reported in
    /// `AddReport.mirror_warning`, not as an error: the item is usable
    /// through its local reference either way.
    pub fn add_item(&self, fields: NewItem, photo: Option<PhotoSource>) -> Result<AddReport> {
        let photo = photo.ok_or(InventoryError::MissingPhoto)?;

        let (id, filename, bytes) = self.commit_local(&fields, photo)?;
        let (photo_reference, mirror_warning) = self.mirror_and_patch(id, &bytes, &filename)?;

        Ok(AddReport {
            id,
            photo_reference,
            mirror_warning,
        })
    }

    /// Phase one: blob to disk, record into the store, cache invalidated.
    /// After this returns the item is queryable with a local reference.
    fn commit_local(&self, fields: &NewItem, photo: PhotoSource) -> Result<(i64, String, Vec<u8>)> {
        let (bytes, filename) = match photo {
            // Millisecond timestamp keeps rapid successive captures distinct
            PhotoSource::Captured { bytes } => {
                (bytes, format!("{}.jpg", Utc::now().timestamp_millis()))
            }
            PhotoSource::Uploaded { bytes, filename } => (bytes, filename),
        };

        let stored = self.blobs.put(&filename, &bytes)?;
        // The record carries the bare name the blob was actually stored
        // under, which may differ from an upload name with path components
        let filename = stored
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(filename);

        let id = self.records.insert(fields, &filename)?;
        self.cache.invalidate();
        Ok((id, filename, bytes))
    }

    /// Phase two: best-effort mirror, then patch the record's reference to
    /// the remote URL. Returns the reference now on the record plus a
    /// warning when the photo stayed local.
    fn mirror_and_patch(
        &self,
        id: i64,
        bytes: &[u8],
        filename: &str,
    ) -> Result<(String, Option<String>)> {
        let Some(mirror) = &self.mirror else {
            return Ok((
                filename.to_string(),
                Some("remote mirror not configured; photo stored locally".to_string()),
            ));
        };

        match mirror.upsert(bytes, filename) {
            Ok(remote_url) => {
                self.records.update_photo_reference(id, &remote_url)?;
                self.cache.invalidate();
                Ok((remote_url, None))
            }
            Err(e) => {
                // The local copy already guarantees the item is usable
                eprintln!("⚠️  Photo for item {id} kept local: {e}");
                Ok((filename.to_string(), Some(e.to_string())))
            }
        }
    }

    /// Update an item's metadata. The photo is immutable after creation;
    /// replacing it means deleting and re-adding the item.
    pub fn edit_item(
        &self,
        id: i64,
        category: Category,
        age_range: AgeRange,
        description: &str,
    ) -> Result<()> {
        self.records.update(id, category, age_range, description)?;
        self.cache.invalidate();
        Ok(())
    }

    /// Remove an item's record. The blob (local or remote) stays behind;
    /// stale blobs are tolerated.
    pub fn delete_item(&self, id: i64) -> Result<()> {
        self.records.delete(id)?;
        self.cache.invalidate();
        Ok(())
    }

    /// All items, served from the cache, ordered by category
    pub fn items(&self) -> Result<Vec<Item>> {
        self.cache.get(&self.records)
    }

    /// Items matching the given filter
    pub fn search(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        Ok(self
            .items()?
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect())
    }

    /// Item count per category, in form order, omitting empty categories
    pub fn category_counts(&self) -> Result<Vec<(Category, usize)>> {
        let items = self.items()?;
        Ok(Category::ALL
            .iter()
            .map(|&c| (c, items.iter().filter(|i| i.category == c).count()))
            .filter(|(_, n)| *n > 0)
            .collect())
    }

    /// Item count per age bucket, youngest first, omitting empty buckets
    pub fn age_range_counts(&self) -> Result<Vec<(AgeRange, usize)>> {
        let items = self.items()?;
        Ok(AgeRange::ALL
            .iter()
            .map(|&a| (a, items.iter().filter(|i| i.age_range == a).count()))
            .filter(|(_, n)| *n > 0)
            .collect())
    }

    /// Resolve an item's photo reference to a fetchable location.
    /// Never fails: an unresolvable reference yields `Missing`, which the
    /// display layer renders as a placeholder with a warning.
    pub fn resolve_photo(&self, item: &Item) -> PhotoLocation {
        if is_remote_reference(&item.photo_reference) {
            return PhotoLocation::Remote(item.photo_reference.clone());
        }
        match self.blobs.resolve_path(&item.photo_reference) {
            Some(path) => PhotoLocation::Local(path),
            None => PhotoLocation::Missing,
        }
    }

    /// Read the bytes behind a local photo reference
    pub fn photo_bytes(&self, item: &Item) -> Result<Vec<u8>> {
        self.blobs.read(&item.photo_reference)
    }

    pub(crate) fn records(&self) -> &RecordStore {
        &self.records
    }

    pub(crate) fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    /// Tear down the inventory, closing the database connection
    pub fn close(self) -> Result<()> {
        self.records.close()
    }
}
