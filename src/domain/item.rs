use crate::domain::board::Board;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display marker for items whose group has no tier assignment.
pub const UNRANKED_LABEL: &str = "?";

/// One catalog entry: a track attributed to a rankable group.
///
/// `tier` is derived from the current board, never authored directly;
/// `None` means the owning group is unranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub group: String,
    pub title: String,
    pub video_id: String,
    #[serde(default)]
    pub views: u64,
    pub year: String,
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl Item {
    pub fn new(
        group: impl Into<String>,
        title: impl Into<String>,
        video_id: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            title: title.into(),
            video_id: video_id.into(),
            views: 0,
            year: String::new(),
            album: String::new(),
            tier: None,
            analysis: None,
        }
    }

    /// Tier label for display, `"?"` when unranked.
    pub fn tier_label(&self) -> &str {
        self.tier.as_deref().unwrap_or(UNRANKED_LABEL)
    }
}

/// Re-tags every item with its group's tier from the current board.
/// Groups absent from the board become unranked.
pub fn assign_tiers(items: &mut [Item], board: &Board) {
    for item in items {
        item.tier = board.tier_of(&item.group).map(str::to_string);
    }
}

/// Persisted catalog snapshot, one record per storage scope, keyed by the
/// year label it was fetched for (possibly comma-joined for multi-year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCache {
    pub year_label: String,
    pub items: Vec<Item>,
    pub saved_at: DateTime<Utc>,
}

impl ItemCache {
    pub fn new(year_label: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            year_label: year_label.into(),
            items,
            saved_at: Utc::now(),
        }
    }
}
