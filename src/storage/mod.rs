use crate::{
    domain::{Board, ItemCache},
    error::Result,
};
use async_trait::async_trait;

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Keyed-blob persistence for boards and the item cache, last write wins.
///
/// `identity` selects the per-user scope when the caller is authenticated;
/// `None` is the anonymous local scope. "No record yet" is `Ok(None)`,
/// reserved errors mean the backend itself failed.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Loads the board for a scope, `None` when nothing was ever saved
    async fn load_board(&self, identity: Option<&str>) -> Result<Option<Board>>;

    /// Saves the board for a scope
    async fn save_board(&self, identity: Option<&str>, board: &Board) -> Result<()>;

    /// Loads the cached item catalog for a scope
    async fn load_item_cache(&self, identity: Option<&str>) -> Result<Option<ItemCache>>;

    /// Saves the cached item catalog for a scope
    async fn save_item_cache(&self, identity: Option<&str>, cache: &ItemCache) -> Result<()>;

    /// Drops the cached item catalog for a scope, if present
    async fn clear_item_cache(&self, identity: Option<&str>) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;
}
