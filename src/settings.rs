use crate::analysis::BackendChoice;
use crate::domain::SortKey;
use serde::{Deserialize, Serialize};

/// User-tunable session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Year label items are fetched for; may be comma-joined for multi-year.
    pub year: String,
    pub analysis_backend: BackendChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_api_key: Option<String>,
    pub sort: SortKey,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            year: "2026".to_string(),
            analysis_backend: BackendChoice::Auto,
            cloud_api_key: None,
            sort: SortKey::Tier,
        }
    }
}
