pub mod library;
pub mod tier_state;

pub use library::{ItemSource, Library};
pub use tier_state::{BoardSource, LoadReport, TierState, DEFAULT_DEBOUNCE};
