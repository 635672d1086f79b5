use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::data::{AgeRange, Category, Item, NewItem};
use crate::error::Result;

/// The RecordStore manages the SQLite inventory database.
/// It stores item metadata and the photo reference column.
pub struct RecordStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open (or create) the database at the given path and initialize
    /// the schema. The parent directory is created if it is missing.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| {
                    crate::error::InventoryError::StorageWriteFailed {
                        path: parent.to_path_buf(),
                        source,
                    }
                })?;
            }
        }

        let conn = Connection::open(db_path)?;
        println!("📁 Database initialized at: {}", db_path.display());

        let store = RecordStore {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database. Used by tests; nothing survives `close`.
    pub fn open_in_memory() -> Result<Self> {
        let store = RecordStore {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Default database location in the user's data directory:
    /// - Linux: ~/.local/share/clothing-inventory/inventory.db
    /// - macOS: ~/Library/Application Support/clothing-inventory/inventory.db
    /// - Windows: %APPDATA%\clothing-inventory\inventory.db
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("clothing-inventory");
        path.push("inventory.db");
        path
    }

    /// Initialize the database schema.
    /// Creates the items table if it doesn't exist.
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                category        TEXT NOT NULL,
                age_range       TEXT NOT NULL,
                photo_path      TEXT NOT NULL,
                description     TEXT NOT NULL
            )",
            [],
        )?;

        // Scans sort by category; keep that cheap as the table grows
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_items_category
             ON items(category)",
            [],
        )?;

        Ok(())
    }

    /// Path of the backing database file, if any
    pub fn path(&self) -> Option<&PathBuf> {
        self.db_path.as_ref()
    }

    /// Number of items currently in the inventory
    pub fn item_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a new item and return its assigned id
    pub fn insert(&self, fields: &NewItem, photo_reference: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO items (category, age_range, photo_path, description)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                fields.category,
                fields.age_range,
                photo_reference,
                fields.description,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update an item's metadata fields. A missing id is a silent no-op.
    pub fn update(
        &self,
        id: i64,
        category: Category,
        age_range: AgeRange,
        description: &str,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET category = ?1, age_range = ?2, description = ?3 WHERE id = ?4",
            rusqlite::params![category, age_range, description, id],
        )?;
        Ok(())
    }

    /// Rewrite an item's photo reference. Called exactly once per item,
    /// when a mirror upload has produced a remote URL for it.
    pub fn update_photo_reference(&self, id: i64, reference: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET photo_path = ?1 WHERE id = ?2",
            rusqlite::params![reference, id],
        )?;
        Ok(())
    }

    /// Delete an item. A missing id is a silent no-op; the photo blob
    /// (local or remote) is left in place.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM items WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
    }

    /// Return every item, ordered by category label with insertion order
    /// as the tie-break. This is the point-in-time snapshot the cache holds.
    pub fn scan(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, age_range, photo_path, description
             FROM items ORDER BY category, id",
        )?;

        let item_iter = stmt.query_map([], |row| {
            Ok(Item {
                id: row.get(0)?,
                category: row.get(1)?,
                age_range: row.get(2)?,
                photo_reference: row.get(3)?,
                description: row.get(4)?,
            })
        })?;

        let mut items = Vec::new();
        for item in item_iter {
            items.push(item?);
        }
        Ok(items)
    }

    /// Close the database connection. Dropping the store closes it too;
    /// this exists so teardown failures are visible to the caller.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(category: Category, description: &str) -> NewItem {
        NewItem {
            category,
            age_range: AgeRange::M3to6,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = RecordStore::open_in_memory().unwrap();
        let a = store.insert(&sample(Category::Tops, "a"), "a.jpg").unwrap();
        let b = store.insert(&sample(Category::Pants, "b"), "b.jpg").unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.item_count().unwrap(), 2);
    }

    #[test]
    fn test_scan_orders_by_category_then_insertion() {
        let store = RecordStore::open_in_memory().unwrap();
        store.insert(&sample(Category::Tops, "t1"), "1.jpg").unwrap();
        store
            .insert(&sample(Category::Dresses, "d1"), "2.jpg")
            .unwrap();
        store.insert(&sample(Category::Tops, "t2"), "3.jpg").unwrap();

        let items = store.scan().unwrap();
        let descs: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        // "Dresses" sorts before "Tops"; the two Tops keep insertion order
        assert_eq!(descs, vec!["d1", "t1", "t2"]);
    }

    #[test]
    fn test_update_and_delete_missing_row_are_noops() {
        let store = RecordStore::open_in_memory().unwrap();
        store
            .update(99, Category::Shoes, AgeRange::NoAge, "nothing")
            .unwrap();
        store.update_photo_reference(99, "x.jpg").unwrap();
        store.delete(99).unwrap();
        assert_eq!(store.item_count().unwrap(), 0);
    }

    #[test]
    fn test_photo_reference_rewrite() {
        let store = RecordStore::open_in_memory().unwrap();
        let id = store
            .insert(&sample(Category::Tops, "shirt"), "shirt1.jpg")
            .unwrap();
        store
            .update_photo_reference(id, "https://mirror.example/photos/shirt1.jpg")
            .unwrap();

        let items = store.scan().unwrap();
        assert_eq!(
            items[0].photo_reference,
            "https://mirror.example/photos/shirt1.jpg"
        );
    }
}
