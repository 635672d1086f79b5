//! Photo persistence and sync core for a clothing inventory tracker.
//!
//! The UI layer hands this crate validated field values and photo bytes;
//! everything below that line lives here:
//!
//! - [`photo::store::BlobStore`] — durable local storage of image bytes
//! - [`photo::mirror::MirrorClient`] — best-effort upserts to a remote
//!   contents API, keyed by the object's current version token
//! - [`state::records::RecordStore`] — SQLite persistence of item records
//! - [`state::cache::InventoryCache`] — read-through cache, explicitly
//!   invalidated on every mutation
//! - [`sync::Inventory`] — the orchestrator tying an Add together: write
//!   locally first, insert the record, then mirror and patch the reference
//!
//! An Add always succeeds once the local copy is down, even when the
//! mirror is unreachable; the item keeps a local photo reference and the
//! mirror failure surfaces as a warning.

pub mod error;
pub mod photo;
pub mod state;
pub mod sync;
pub mod transfer;

pub use error::{InventoryError, Result};
pub use photo::mirror::{MirrorClient, MirrorConfig};
pub use photo::store::BlobStore;
pub use state::data::{AgeRange, Category, Item, NewItem, PhotoSource};
pub use state::records::RecordStore;
pub use sync::{AddReport, Inventory, ItemFilter, PhotoLocation};
pub use transfer::ImportReport;
