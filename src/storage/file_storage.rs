use crate::{
    domain::{Board, ItemCache},
    error::Result,
    storage::Storage,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const TIERCADE_DIR: &'static str = ".tiercade";
    const USERS_DIR: &'static str = "users";
    const BOARD_FILE: &'static str = "board.json";
    const ITEM_CACHE_FILE: &'static str = "item_cache.json";

    /// Creates a new FileStorage instance rooted at the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().join(Self::TIERCADE_DIR),
        }
    }

    /// Maps an identity to a filename-safe directory token. Identities are
    /// opaque strings from the auth collaborator and may contain anything.
    fn sanitize_identity(identity: &str) -> String {
        identity
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn scope_dir(&self, identity: Option<&str>) -> PathBuf {
        match identity {
            Some(id) => self
                .root_path
                .join(Self::USERS_DIR)
                .join(Self::sanitize_identity(id)),
            None => self.root_path.clone(),
        }
    }

    fn board_file(&self, identity: Option<&str>) -> PathBuf {
        self.scope_dir(identity).join(Self::BOARD_FILE)
    }

    fn item_cache_file(&self, identity: Option<&str>) -> PathBuf {
        self.scope_dir(identity).join(Self::ITEM_CACHE_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.ensure_directory_exists(parent).await?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        self.ensure_directory_exists(&self.root_path.join(Self::USERS_DIR))
            .await?;
        Ok(())
    }

    async fn load_board(&self, identity: Option<&str>) -> Result<Option<Board>> {
        self.read_json(&self.board_file(identity)).await
    }

    async fn save_board(&self, identity: Option<&str>, board: &Board) -> Result<()> {
        self.write_json(&self.board_file(identity), board).await
    }

    async fn load_item_cache(&self, identity: Option<&str>) -> Result<Option<ItemCache>> {
        self.read_json(&self.item_cache_file(identity)).await
    }

    async fn save_item_cache(&self, identity: Option<&str>, cache: &ItemCache) -> Result<()> {
        self.write_json(&self.item_cache_file(identity), cache).await
    }

    async fn clear_item_cache(&self, identity: Option<&str>) -> Result<()> {
        let path = self.item_cache_file(identity);
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}
