//! # Tiercade Core
//!
//! Core business logic and domain models for Tiercade tier-list ranking.
//!
//! This crate provides the fundamental types and operations for managing
//! tier boards, head-to-head battle brackets, and the item catalog behind
//! them, without any dependency on specific UI implementations or transport
//! layers.

pub mod analysis;
pub mod domain;
pub mod error;
pub mod import;
pub mod media;
pub mod settings;
pub mod state;
pub mod storage;

// Re-export commonly used types
pub use analysis::{AnalysisBackend, AnalysisRouter, BackendChoice};
pub use domain::{
    board::{Board, Direction, Tier},
    bracket::{Bracket, Entrant, Match, Phase},
    item::{Item, ItemCache},
    sorting::SortKey,
};
pub use error::{Result, TiercadeError};
pub use settings::Settings;
pub use state::{BoardSource, ItemSource, Library, LoadReport, TierState};
pub use storage::Storage;
