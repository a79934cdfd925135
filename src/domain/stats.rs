//! Aggregations behind the statistics view. All functions are pure reads
//! over the catalog and the current board.

use crate::domain::board::{Board, FALLBACK_COLOR};
use crate::domain::item::{Item, UNRANKED_LABEL};
use serde::Serialize;
use std::collections::HashMap;

/// Total views accumulated by one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupViews {
    pub name: String,
    pub views: u64,
}

/// Item count for one tier (or the unranked bucket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSlice {
    pub label: String,
    pub count: usize,
    pub color: String,
}

/// View totals for one tier of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierViews {
    pub label: String,
    pub total_views: u64,
    pub average_views: u64,
    pub color: String,
}

/// Item count per release year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: String,
    pub count: usize,
}

/// Headline numbers for the stat cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_tracks: usize,
    pub distinct_groups: usize,
    pub most_viewed_group: Option<String>,
    pub total_views: u64,
}

/// Groups ranked by accumulated views, truncated to `limit`.
pub fn top_groups_by_views(items: &[Item], limit: usize) -> Vec<GroupViews> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for item in items {
        *totals.entry(item.group.as_str()).or_default() += item.views;
    }
    let mut rows: Vec<GroupViews> = totals
        .into_iter()
        .map(|(name, views)| GroupViews {
            name: name.to_string(),
            views,
        })
        .collect();
    rows.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.name.cmp(&b.name)));
    rows.truncate(limit);
    rows
}

/// Item counts per tier, in board order, with one trailing `"?"` bucket for
/// unranked items when any exist.
pub fn tier_distribution(items: &[Item], board: &Board) -> Vec<TierSlice> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.tier_label()).or_default() += 1;
    }

    let mut rows: Vec<TierSlice> = board
        .tiers()
        .iter()
        .filter_map(|tier| {
            counts.remove(tier.label.as_str()).map(|count| TierSlice {
                label: tier.label.clone(),
                count,
                color: tier.display_color().to_string(),
            })
        })
        .collect();

    if let Some(count) = counts.remove(UNRANKED_LABEL) {
        rows.push(TierSlice {
            label: UNRANKED_LABEL.to_string(),
            count,
            color: FALLBACK_COLOR.to_string(),
        });
    }
    rows
}

/// Total and average views per tier, in board order. Tiers with no views
/// are dropped.
pub fn views_by_tier(items: &[Item], board: &Board) -> Vec<TierViews> {
    let mut totals: HashMap<&str, (u64, usize)> = HashMap::new();
    for item in items {
        let entry = totals.entry(item.tier_label()).or_default();
        entry.0 += item.views;
        entry.1 += 1;
    }

    board
        .tiers()
        .iter()
        .filter_map(|tier| {
            let (total, count) = totals.get(tier.label.as_str()).copied()?;
            if total == 0 {
                return None;
            }
            Some(TierViews {
                label: tier.label.clone(),
                total_views: total,
                average_views: ((total as f64) / (count as f64)).round() as u64,
                color: tier.display_color().to_string(),
            })
        })
        .collect()
}

/// Item counts per year label, sorted by year.
pub fn year_breakdown(items: &[Item]) -> Vec<YearCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.year.as_str()).or_default() += 1;
    }
    let mut rows: Vec<YearCount> = counts
        .into_iter()
        .map(|(year, count)| YearCount {
            year: year.to_string(),
            count,
        })
        .collect();
    rows.sort_by(|a, b| a.year.cmp(&b.year));
    rows
}

/// Headline numbers: track count, distinct groups, the single most viewed
/// group, and the grand view total.
pub fn overview(items: &[Item]) -> Overview {
    let groups: std::collections::HashSet<&str> =
        items.iter().map(|i| i.group.as_str()).collect();
    let most_viewed_group = top_groups_by_views(items, 1)
        .into_iter()
        .next()
        .map(|g| g.name);
    Overview {
        total_tracks: items.len(),
        distinct_groups: groups.len(),
        most_viewed_group,
        total_views: items.iter().map(|i| i.views).sum(),
    }
}

/// Compact human form for large view counts: 1.2B, 3.4M, 567K.
pub fn format_views(views: u64) -> String {
    match views {
        v if v >= 1_000_000_000 => format!("{:.1}B", v as f64 / 1e9),
        v if v >= 1_000_000 => format!("{:.1}M", v as f64 / 1e6),
        v if v >= 1_000 => format!("{:.0}K", v as f64 / 1e3),
        v => v.to_string(),
    }
}
