/// Error taxonomy for the inventory core
///
/// The variants map directly onto the recovery policies the caller needs:
/// - `MissingPhoto` is recovered by re-prompting; nothing was written.
/// - `StorageWriteFailed` aborts the Add before any record exists.
/// - `MirrorFailed` is downgraded to a warning by the orchestrator because
///   the local copy already guarantees the item is usable.
/// - `NotFound` is rendered as a visible warning, never a hard failure.
/// - `ImportMalformed` is reported per-file or per-row; imported rows stay.
/// - `Database` failures mean the store is unavailable and propagate as-is.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    /// The Add form was submitted without a captured or uploaded photo
    #[error("no photo was provided")]
    MissingPhoto,

    /// The mandatory local blob write failed; the Add was aborted
    #[error("failed to write photo to {path}: {source}")]
    StorageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote mirror rejected or never answered the upsert
    #[error("mirror upload failed: {0}")]
    MirrorFailed(String),

    /// A referenced blob or record id did not resolve
    #[error("not found: {0}")]
    NotFound(String),

    /// A bulk import file or row did not match the expected shape
    #[error("import malformed at line {line}: {reason}")]
    ImportMalformed { line: usize, reason: String },

    /// SQLite failure; the store is unavailable
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV-level failure while reading or writing a transfer file
    #[error("transfer error: {0}")]
    Transfer(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, InventoryError>;
