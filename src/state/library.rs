use crate::{
    domain::{assign_tiers, sort_items, Board, Item, ItemCache, SortKey},
    error::Result,
    storage::Storage,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// External data-fetch collaborator producing catalog entries for a set of
/// groups and a year label. Implementations live outside the core.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_items(&self, groups: &[String], year: &str) -> Result<Vec<Item>>;
}

/// The item catalog: fetched or imported tracks, tagged with tiers from the
/// current board and mirrored into a per-scope cache record.
///
/// A failed fetch leaves the previous catalog untouched; cache writes are
/// best-effort and never fail the operation that triggered them.
pub struct Library {
    items: Vec<Item>,
    year_label: Option<String>,
    storage: Arc<dyn Storage>,
    identity: Option<String>,
}

impl Library {
    pub fn new(storage: Arc<dyn Storage>, identity: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            year_label: None,
            storage,
            identity,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn year_label(&self) -> Option<&str> {
        self.year_label.as_deref()
    }

    /// Distinct group names present in the catalog, in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|i| seen.insert(i.group.as_str()))
            .map(|i| i.group.clone())
            .collect()
    }

    /// Installs the cached catalog for this scope, if one exists. Cache
    /// trouble is non-fatal: the library just starts empty.
    pub async fn restore(&mut self) -> bool {
        match self.storage.load_item_cache(self.identity.as_deref()).await {
            Ok(Some(cache)) if !cache.items.is_empty() => {
                self.items = cache.items;
                self.year_label = Some(cache.year_label);
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("item cache restore failed: {e}");
                false
            }
        }
    }

    /// Fetches entries for `groups` in `year` from the collaborator,
    /// tags them with tiers from the board, and installs them as the new
    /// catalog. Returns the number of entries installed.
    pub async fn load_items(
        &mut self,
        source: &dyn ItemSource,
        groups: &[String],
        year: &str,
        board: &Board,
    ) -> Result<usize> {
        let mut fetched = source.fetch_items(groups, year).await?;
        assign_tiers(&mut fetched, board);

        self.items = fetched;
        self.year_label = Some(year.to_string());
        self.write_cache().await;
        Ok(self.items.len())
    }

    /// Appends imported entries, skipping any whose `video_id` is already
    /// in the catalog. Returns the number actually added.
    pub async fn merge_imported(&mut self, imported: Vec<Item>, board: &Board) -> Result<usize> {
        let known: HashSet<String> = self.items.iter().map(|i| i.video_id.clone()).collect();
        let mut fresh: Vec<Item> = Vec::new();
        let mut batch_seen = known;
        for item in imported {
            if batch_seen.insert(item.video_id.clone()) {
                fresh.push(item);
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }

        assign_tiers(&mut fresh, board);
        let added = fresh.len();
        self.items.extend(fresh);
        if self.year_label.is_none() {
            self.year_label = Some(String::new());
        }
        self.write_cache().await;
        Ok(added)
    }

    /// Re-derives every item's tier from the board, e.g. after drag
    /// operations re-bucketed groups. In-memory only; the cache catches up
    /// on the next load or import.
    pub fn retag(&mut self, board: &Board) {
        assign_tiers(&mut self.items, board);
    }

    /// Records an analysis blurb against the matching entry.
    pub fn update_analysis(&mut self, video_id: &str, analysis: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|i| i.video_id == video_id) {
            Some(item) => {
                item.analysis = Some(analysis.into());
                true
            }
            None => false,
        }
    }

    /// The catalog ordered by the given key, leaving the stored order alone.
    pub fn sorted(&self, key: SortKey, tier_order: &[String]) -> Vec<Item> {
        let mut items = self.items.clone();
        sort_items(&mut items, key, tier_order);
        items
    }

    /// Drops the catalog and its cache record.
    pub async fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.year_label = None;
        self.storage.clear_item_cache(self.identity.as_deref()).await
    }

    async fn write_cache(&self) {
        let Some(year_label) = &self.year_label else {
            return;
        };
        let cache = ItemCache::new(year_label.clone(), self.items.clone());
        match self
            .storage
            .save_item_cache(self.identity.as_deref(), &cache)
            .await
        {
            Ok(()) => debug!("item cache written ({} items)", cache.items.len()),
            Err(e) => warn!("item cache write failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Tier;
    use crate::error::TiercadeError;
    use crate::storage::MemoryStorage;

    struct StubSource {
        items: Vec<Item>,
        fail: bool,
    }

    #[async_trait]
    impl ItemSource for StubSource {
        async fn fetch_items(&self, groups: &[String], year: &str) -> Result<Vec<Item>> {
            if self.fail {
                return Err(TiercadeError::FetchError("upstream down".to_string()));
            }
            Ok(self
                .items
                .iter()
                .filter(|i| groups.contains(&i.group) && i.year == year)
                .cloned()
                .collect())
        }
    }

    fn item(group: &str, title: &str, vid: &str, year: &str) -> Item {
        let mut item = Item::new(group, title, vid);
        item.year = year.to_string();
        item
    }

    fn ranked_board() -> Board {
        Board::from_tiers(vec![
            Tier {
                label: "S".to_string(),
                color: None,
                items: vec!["aespa".to_string()],
            },
            Tier {
                label: "A".to_string(),
                color: None,
                items: vec!["IVE".to_string()],
            },
        ])
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_load_items_enriches_and_caches() {
        let storage = Arc::new(MemoryStorage::new());
        let source = StubSource {
            items: vec![
                item("aespa", "Whiplash", "v1", "2026"),
                item("NewJeans", "Supernatural", "v2", "2026"),
                item("aespa", "Armageddon", "v3", "2025"),
            ],
            fail: false,
        };

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        let count = library
            .load_items(&source, &groups(&["aespa", "NewJeans"]), "2026", &ranked_board())
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(library.items()[0].tier.as_deref(), Some("S"));
        assert_eq!(library.items()[1].tier, None);
        assert_eq!(library.year_label(), Some("2026"));

        let cache = storage.load_item_cache(None).await.unwrap().unwrap();
        assert_eq!(cache.year_label, "2026");
        assert_eq!(cache.items, library.items());
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_catalog_intact() {
        let storage = Arc::new(MemoryStorage::new());
        let good = StubSource {
            items: vec![item("aespa", "Whiplash", "v1", "2026")],
            fail: false,
        };
        let bad = StubSource {
            items: vec![],
            fail: true,
        };

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        library
            .load_items(&good, &groups(&["aespa"]), "2026", &ranked_board())
            .await
            .unwrap();

        let err = library
            .load_items(&bad, &groups(&["aespa"]), "2026", &ranked_board())
            .await
            .unwrap_err();
        assert!(matches!(err, TiercadeError::FetchError(_)));
        assert_eq!(library.items().len(), 1);
    }

    #[tokio::test]
    async fn test_restore_from_cache() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ItemCache::new("2025,2026", vec![item("IVE", "Rebel Heart", "v9", "2025")]);
        storage.save_item_cache(None, &cache).await.unwrap();

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        assert!(library.restore().await);
        assert_eq!(library.items().len(), 1);
        assert_eq!(library.year_label(), Some("2025,2026"));

        // A different scope has no cache to restore.
        let mut other = Library::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            Some("bob".to_string()),
        );
        assert!(!other.restore().await);
        assert!(other.items().is_empty());
    }

    #[tokio::test]
    async fn test_merge_imported_dedups_by_video_id() {
        let storage = Arc::new(MemoryStorage::new());
        let source = StubSource {
            items: vec![item("aespa", "Whiplash", "v1", "2026")],
            fail: false,
        };

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        library
            .load_items(&source, &groups(&["aespa"]), "2026", &ranked_board())
            .await
            .unwrap();

        let added = library
            .merge_imported(
                vec![
                    item("aespa", "Whiplash", "v1", "2026"), // already present
                    item("IVE", "Rebel Heart", "v2", "2025"),
                    item("IVE", "Rebel Heart", "v2", "2025"), // duplicate inside batch
                ],
                &ranked_board(),
            )
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(library.items().len(), 2);
        assert_eq!(library.items()[1].tier.as_deref(), Some("A"));

        // Nothing new: the merge is a counted no-op.
        let added = library
            .merge_imported(vec![item("IVE", "Rebel Heart", "v2", "2025")], &ranked_board())
            .await
            .unwrap();
        assert_eq!(added, 0);
    }

    #[tokio::test]
    async fn test_clear_drops_catalog_and_cache() {
        let storage = Arc::new(MemoryStorage::new());
        let source = StubSource {
            items: vec![item("aespa", "Whiplash", "v1", "2026")],
            fail: false,
        };

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        library
            .load_items(&source, &groups(&["aespa"]), "2026", &ranked_board())
            .await
            .unwrap();

        library.clear().await.unwrap();
        assert!(library.items().is_empty());
        assert_eq!(library.year_label(), None);
        assert!(storage.load_item_cache(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_retag_and_update_analysis() {
        let storage = Arc::new(MemoryStorage::new());
        let source = StubSource {
            items: vec![item("aespa", "Whiplash", "v1", "2026")],
            fail: false,
        };

        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        library
            .load_items(&source, &groups(&["aespa"]), "2026", &ranked_board())
            .await
            .unwrap();
        assert_eq!(library.items()[0].tier.as_deref(), Some("S"));

        // The group got dragged off the board: it is unranked now.
        let empty_board = Board::from_tiers(vec![Tier::new("S", None)]);
        library.retag(&empty_board);
        assert_eq!(library.items()[0].tier, None);

        assert!(library.update_analysis("v1", "tight synth bass"));
        assert_eq!(
            library.items()[0].analysis.as_deref(),
            Some("tight synth bass")
        );
        assert!(!library.update_analysis("missing", "nope"));
    }

    #[tokio::test]
    async fn test_groups_first_seen_order() {
        let storage = Arc::new(MemoryStorage::new());
        let mut library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, None);
        library
            .merge_imported(
                vec![
                    item("IVE", "a", "v1", "2025"),
                    item("aespa", "b", "v2", "2025"),
                    item("IVE", "c", "v3", "2025"),
                ],
                &ranked_board(),
            )
            .await
            .unwrap();

        assert_eq!(library.groups(), vec!["IVE", "aespa"]);
    }
}
