/// State management module
///
/// This module handles all inventory state, including:
/// - Database persistence of item records (records.rs)
/// - Shared data structures (data.rs)
/// - The explicitly-invalidated read-through cache (cache.rs)

pub mod cache;
pub mod data;
pub mod records;
