//! Thumbnail lookups with an explicit, injected, grow-only cache.

use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// External lookup collaborator resolving a display name to an image URL.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    /// `Ok(None)` means the collaborator has no thumbnail for this name.
    async fn thumbnail_url(&self, name: &str) -> Result<Option<String>>;
}

/// Process-lifetime thumbnail cache. Grow-only: entries are never evicted.
///
/// Only successful, non-empty lookups are cached; misses and failures are
/// retried on the next request.
#[derive(Default)]
pub struct ThumbnailCache {
    entries: Mutex<HashMap<String, String>>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached URL for `name`, if any.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached URL or asks the collaborator. A lookup failure is
    /// scoped to this request: it logs, returns `None`, and caches nothing.
    pub async fn get_or_fetch(
        &self,
        name: &str,
        source: &dyn ThumbnailSource,
    ) -> Option<String> {
        if let Some(url) = self.get(name) {
            return Some(url);
        }

        match source.thumbnail_url(name).await {
            Ok(Some(url)) if !url.is_empty() => {
                if let Ok(mut entries) = self.entries.lock() {
                    entries.insert(name.to_string(), url.clone());
                }
                Some(url)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("thumbnail lookup failed for {name}: {e}");
                None
            }
        }
    }
}
