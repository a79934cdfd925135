pub mod board;
pub mod bracket;
pub mod item;
pub mod sorting;
pub mod stats;

pub use board::{Board, Direction, Tier};
pub use bracket::{Bracket, Entrant, Match, Phase};
pub use item::{assign_tiers, Item, ItemCache, UNRANKED_LABEL};
pub use sorting::{sort_items, SortKey};
