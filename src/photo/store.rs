use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, Result};

/// Local durable storage for photo bytes.
///
/// Blobs live flat under a single root directory, keyed by bare filename.
/// References coming back out of the database may be bare filenames, or
/// absolute paths recorded before the root was relocated; both resolve by
/// discarding everything but the final path component.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a blob store rooted at `root`, creating the directory if needed
    pub fn new(root: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(root)?;
        Ok(BlobStore {
            root: root.to_path_buf(),
        })
    }

    /// Default photo directory in the user's data directory:
    /// ~/.local/share/clothing-inventory/photos on Linux
    pub fn default_root() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("clothing-inventory");
        path.push("photos");
        path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` to `root/filename`, replacing any existing blob with
    /// that name. The write is flushed and synced before returning, so a
    /// successful `put` means the bytes are on disk.
    pub fn put(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(normalize(filename).ok_or_else(|| {
            InventoryError::StorageWriteFailed {
                path: self.root.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("unusable filename: {filename:?}"),
                ),
            }
        })?);

        let write = |path: &Path| -> std::io::Result<()> {
            // The root can vanish between calls on ephemeral runtimes
            fs::create_dir_all(&self.root)?;
            let mut file = fs::File::create(path)?;
            file.write_all(bytes)?;
            file.sync_all()
        };

        write(&path).map_err(|source| InventoryError::StorageWriteFailed {
            path: path.clone(),
            source,
        })?;

        println!("📸 Stored photo: {}", path.display());
        Ok(path)
    }

    /// Resolve a stored reference to the on-disk path of its blob.
    /// Returns `None` when no blob with that name exists under the root.
    pub fn resolve_path(&self, reference: &str) -> Option<PathBuf> {
        let path = self.root.join(normalize(reference)?);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }

    /// Read a referenced blob back as bytes
    pub fn read(&self, reference: &str) -> Result<Vec<u8>> {
        let path = self
            .resolve_path(reference)
            .ok_or_else(|| InventoryError::NotFound(reference.to_string()))?;
        fs::read(&path).map_err(|_| InventoryError::NotFound(reference.to_string()))
    }
}

/// Reduce a reference to a bare filename by dropping every directory
/// component, on either separator convention. This keeps lookups inside
/// the root (no traversal) and tolerates absolute paths stored by older
/// versions of the app.
fn normalize(reference: &str) -> Option<String> {
    let bare = reference
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(reference)
        .trim();
    if bare.is_empty() || bare == "." || bare == ".." {
        return None;
    }
    Some(bare.to_string())
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore").field("root", &self.root).finish()
    }
}
