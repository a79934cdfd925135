use crate::error::{Result, TiercadeError};
use serde::{Deserialize, Serialize};

/// Neutral fallback when a tier has no custom color and no palette entry.
pub const FALLBACK_COLOR: &str = "#888888";

/// Swatches offered by the tier editor.
pub const PRESET_COLORS: [&str; 15] = [
    "#FFD700", "#FF6B6B", "#9D50BB", "#00C9FF", "#92FE9D", "#FF8C00", "#FF69B4", "#6366F1",
    "#14B8A6", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#10B981", "#bdc3c7",
];

/// Label-keyed default palette for the built-in template tiers.
const DEFAULT_TIER_COLORS: [(&str, &str); 6] = [
    ("PEAK", "#FFD700"),
    ("SSS", "#9D50BB"),
    ("S", "#ff4b4b"),
    ("A", "#00C9FF"),
    ("B", "#92FE9D"),
    ("C", "#bdc3c7"),
];

/// Direction for swapping a tier with its neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A named, colored, ordered bucket of item identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Tier {
    pub fn new(label: impl Into<String>, color: Option<String>) -> Self {
        Self {
            label: label.into(),
            color,
            items: Vec::new(),
        }
    }

    /// Resolves the display color: custom, then label-keyed palette, then gray.
    pub fn display_color(&self) -> &str {
        if let Some(color) = &self.color {
            return color;
        }
        DEFAULT_TIER_COLORS
            .iter()
            .find(|(label, _)| *label == self.label)
            .map(|(_, color)| *color)
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// Ordered collection of tiers, best tier first.
///
/// Serializes as a plain array of tiers, which is also the persisted schema.
/// Item identifiers are unique across the whole board; every mutation
/// rejects invalid input before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tiers: Vec<Tier>,
}

impl Default for Board {
    /// The built-in template: PEAK through C, palette colors, no items.
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIER_COLORS
                .iter()
                .map(|(label, color)| Tier::new(*label, Some((*color).to_string())))
                .collect(),
        }
    }
}

impl Board {
    /// Builds a board from pre-existing tiers, e.g. a persisted record.
    /// An empty record falls back to the default template so the at-least-one-tier
    /// invariant holds from the start.
    pub fn from_tiers(tiers: Vec<Tier>) -> Self {
        if tiers.is_empty() {
            Self::default()
        } else {
            Self { tiers }
        }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Tier labels in board order, best first. This is the rank order used
    /// for tier-based sorting.
    pub fn tier_labels(&self) -> Vec<String> {
        self.tiers.iter().map(|t| t.label.clone()).collect()
    }

    /// All item identifiers across the board, in board-then-tier order.
    pub fn all_items(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().flat_map(|t| t.items.iter().map(String::as_str))
    }

    /// Locates an item, returning `(tier_index, position)`.
    ///
    /// The drag surface derives its indices through this scan rather than
    /// trusting caller-held positions.
    pub fn find_item(&self, item: &str) -> Option<(usize, usize)> {
        self.tiers.iter().enumerate().find_map(|(ti, tier)| {
            tier.items.iter().position(|i| i == item).map(|pi| (ti, pi))
        })
    }

    /// Label of the tier currently holding `item`, if any.
    pub fn tier_of(&self, item: &str) -> Option<&str> {
        self.find_item(item).map(|(ti, _)| self.tiers[ti].label.as_str())
    }

    fn check_tier_index(&self, index: usize) -> Result<()> {
        if index >= self.tiers.len() {
            return Err(TiercadeError::TierIndexOutOfBounds(index));
        }
        Ok(())
    }

    /// Relocates `item` from tier `from` to `position` within tier `to`.
    ///
    /// The move is an atomic relocation, never a copy. A move that changes
    /// nothing is a successful no-op. The item must currently live in `from`;
    /// anything else is a caller bug surfaced as an error.
    pub fn move_item(&mut self, item: &str, from: usize, to: usize, position: usize) -> Result<()> {
        self.check_tier_index(from)?;
        self.check_tier_index(to)?;

        let source_pos = self.tiers[from]
            .items
            .iter()
            .position(|i| i == item)
            .ok_or_else(|| TiercadeError::ItemNotInTier {
                item: item.to_string(),
                tier: from,
            })?;

        if from == to && source_pos == position {
            return Ok(());
        }

        let item = self.tiers[from].items.remove(source_pos);
        let dest = &mut self.tiers[to].items;
        dest.insert(position.min(dest.len()), item);
        Ok(())
    }

    /// Moves an item within one tier, preserving the relative order of all
    /// other items in that tier.
    pub fn reorder_item(&mut self, tier: usize, from_pos: usize, to_pos: usize) -> Result<()> {
        self.check_tier_index(tier)?;
        let items = &mut self.tiers[tier].items;
        if from_pos >= items.len() {
            return Err(TiercadeError::ItemNotInTier {
                item: format!("#{from_pos}"),
                tier,
            });
        }
        if from_pos == to_pos {
            return Ok(());
        }
        let item = items.remove(from_pos);
        items.insert(to_pos.min(items.len()), item);
        Ok(())
    }

    /// Appends a new empty tier. Labels are trimmed and must be unique
    /// (case-sensitive exact match).
    pub fn add_tier(&mut self, label: &str, color: Option<String>) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(TiercadeError::EmptyTierLabel);
        }
        if self.tiers.iter().any(|t| t.label == label) {
            return Err(TiercadeError::DuplicateTierLabel(label.to_string()));
        }
        self.tiers.push(Tier::new(label, color));
        Ok(())
    }

    /// Removes the tier at `index`, appending its items to the adjacent tier:
    /// the next tier when removing index 0, otherwise the previous one.
    /// The last remaining tier cannot be removed.
    pub fn remove_tier(&mut self, index: usize) -> Result<()> {
        self.check_tier_index(index)?;
        if self.tiers.len() == 1 {
            return Err(TiercadeError::LastTier);
        }

        let removed = self.tiers.remove(index);
        let target = if index == 0 { 0 } else { index - 1 };
        self.tiers[target].items.extend(removed.items);
        Ok(())
    }

    /// Renames the tier at `index`. Uniqueness is enforced the same way as
    /// on add; renaming a tier to its current label is a no-op success.
    pub fn rename_tier(&mut self, index: usize, new_label: &str) -> Result<()> {
        self.check_tier_index(index)?;
        let new_label = new_label.trim();
        if new_label.is_empty() {
            return Err(TiercadeError::EmptyTierLabel);
        }
        if self
            .tiers
            .iter()
            .enumerate()
            .any(|(i, t)| i != index && t.label == new_label)
        {
            return Err(TiercadeError::DuplicateTierLabel(new_label.to_string()));
        }
        self.tiers[index].label = new_label.to_string();
        Ok(())
    }

    /// Sets or clears the custom color of the tier at `index`.
    pub fn recolor_tier(&mut self, index: usize, color: Option<String>) -> Result<()> {
        self.check_tier_index(index)?;
        self.tiers[index].color = color;
        Ok(())
    }

    /// Swaps the tier at `index` with its neighbor. No-op at either boundary.
    pub fn move_tier(&mut self, index: usize, direction: Direction) -> Result<()> {
        self.check_tier_index(index)?;
        match direction {
            Direction::Up if index > 0 => self.tiers.swap(index, index - 1),
            Direction::Down if index + 1 < self.tiers.len() => self.tiers.swap(index, index + 1),
            _ => {}
        }
        Ok(())
    }
}
