use crate::{
    domain::{Board, ItemCache},
    error::{Result, TiercadeError},
    storage::Storage,
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

/// In-process storage backend.
///
/// Doubles as the remote stand-in in tests and as a throwaway scratch store;
/// the write counter and the failure toggle exist so callers can observe
/// debounce coalescing and persist-failure handling from the outside.
#[derive(Default)]
pub struct MemoryStorage {
    boards: Mutex<HashMap<String, Board>>,
    caches: Mutex<HashMap<String, ItemCache>>,
    board_writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn scope_key(identity: Option<&str>) -> String {
        identity.unwrap_or("").to_string()
    }

    /// Number of board writes accepted so far.
    pub fn board_write_count(&self) -> usize {
        self.board_writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent write fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read fail until switched back.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TiercadeError::StorageError(
                "memory storage writes disabled".to_string(),
            ));
        }
        Ok(())
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(TiercadeError::StorageError(
                "memory storage reads disabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| TiercadeError::StorageError("storage mutex poisoned".to_string()))
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn load_board(&self, identity: Option<&str>) -> Result<Option<Board>> {
        self.check_reads()?;
        let boards = lock(&self.boards)?;
        Ok(boards.get(&Self::scope_key(identity)).cloned())
    }

    async fn save_board(&self, identity: Option<&str>, board: &Board) -> Result<()> {
        self.check_writes()?;
        let mut boards = lock(&self.boards)?;
        boards.insert(Self::scope_key(identity), board.clone());
        self.board_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_item_cache(&self, identity: Option<&str>) -> Result<Option<ItemCache>> {
        self.check_reads()?;
        let caches = lock(&self.caches)?;
        Ok(caches.get(&Self::scope_key(identity)).cloned())
    }

    async fn save_item_cache(&self, identity: Option<&str>, cache: &ItemCache) -> Result<()> {
        self.check_writes()?;
        let mut caches = lock(&self.caches)?;
        caches.insert(Self::scope_key(identity), cache.clone());
        Ok(())
    }

    async fn clear_item_cache(&self, identity: Option<&str>) -> Result<()> {
        self.check_writes()?;
        let mut caches = lock(&self.caches)?;
        caches.remove(&Self::scope_key(identity));
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scopes_and_write_count() {
        let storage = MemoryStorage::new();
        assert!(storage.load_board(None).await.unwrap().is_none());

        storage.save_board(None, &Board::default()).await.unwrap();
        let mut user_board = Board::default();
        user_board.add_tier("D", None).unwrap();
        storage.save_board(Some("u1"), &user_board).await.unwrap();

        assert_eq!(storage.board_write_count(), 2);
        assert_eq!(
            storage.load_board(Some("u1")).await.unwrap().unwrap(),
            user_board
        );
        assert_eq!(
            storage.load_board(None).await.unwrap().unwrap(),
            Board::default()
        );
    }

    #[tokio::test]
    async fn test_failure_toggles() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        assert!(storage.save_board(None, &Board::default()).await.is_err());
        assert_eq!(storage.board_write_count(), 0);

        storage.set_fail_writes(false);
        storage.save_board(None, &Board::default()).await.unwrap();

        storage.set_fail_reads(true);
        assert!(storage.load_board(None).await.is_err());
        storage.set_fail_reads(false);
        assert!(storage.load_board(None).await.unwrap().is_some());
    }
}
