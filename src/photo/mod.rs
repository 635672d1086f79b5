/// Photo persistence module
///
/// This module handles:
/// - Durable local storage of photo bytes (store.rs)
/// - Best-effort upserts to the remote mirror (mirror.rs)

pub mod mirror;
pub mod store;
