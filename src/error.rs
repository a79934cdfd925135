use thiserror::Error;

pub type Result<T> = std::result::Result<T, TiercadeError>;

#[derive(Debug, Error)]
pub enum TiercadeError {
    #[error("Tier label cannot be empty")]
    EmptyTierLabel,

    #[error("Tier \"{0}\" already exists")]
    DuplicateTierLabel(String),

    #[error("Tier index {0} out of bounds")]
    TierIndexOutOfBounds(usize),

    #[error("A board must keep at least one tier")]
    LastTier,

    #[error("Item \"{item}\" is not in tier {tier}")]
    ItemNotInTier { item: String, tier: usize },

    #[error("Need at least 2 entrants to start a battle")]
    NotEnoughEntrants,

    #[error("Battle is not in a state that allows this action")]
    InvalidPhase,

    #[error("\"{0}\" is not part of the current match")]
    NotInCurrentMatch(String),

    #[error("Local analysis backend is not reachable")]
    LocalBackendUnavailable,

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Not a supported playlist URL: {0}")]
    InvalidPlaylistUrl(String),

    #[error("Item fetch failed: {0}")]
    FetchError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
