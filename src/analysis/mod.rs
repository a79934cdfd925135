//! Analysis backend selection: a local model first, a cloud fallback.
//!
//! The concrete HTTP clients are external collaborators; this module owns
//! only the strategy — which backend handles a request, and when failure
//! falls through — with the local availability probe cached for the session.

use crate::error::{Result, TiercadeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which backend the user asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Local when reachable, cloud otherwise.
    #[default]
    Auto,
    /// Local only; unreachable is an error.
    Local,
    /// Cloud only; the local probe is skipped entirely.
    Cloud,
}

/// One analysis provider.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Cheap reachability check. Backends that are always on keep the
    /// default.
    async fn probe(&self) -> bool {
        true
    }

    /// Produces an analysis blurb for one track.
    async fn analyze(&self, title: &str, group: &str) -> Result<String>;
}

/// Routes analysis requests per the configured choice.
pub struct AnalysisRouter {
    choice: BackendChoice,
    local: Arc<dyn AnalysisBackend>,
    cloud: Arc<dyn AnalysisBackend>,
    local_available: Option<bool>,
}

impl AnalysisRouter {
    pub fn new(
        choice: BackendChoice,
        local: Arc<dyn AnalysisBackend>,
        cloud: Arc<dyn AnalysisBackend>,
    ) -> Self {
        Self {
            choice,
            local,
            cloud,
            local_available: None,
        }
    }

    pub fn choice(&self) -> BackendChoice {
        self.choice
    }

    /// Changing the choice invalidates the cached probe result.
    pub fn set_choice(&mut self, choice: BackendChoice) {
        if self.choice != choice {
            self.choice = choice;
            self.local_available = None;
        }
    }

    /// Analyzes one track via the selected strategy.
    ///
    /// `Auto` falls through to the cloud backend when the local one is
    /// unreachable or fails; `Local` propagates instead. The reachability
    /// probe runs at most once per session.
    pub async fn analyze(&mut self, title: &str, group: &str) -> Result<String> {
        if matches!(self.choice, BackendChoice::Local | BackendChoice::Auto) {
            let available = self.probe_local().await;

            if self.choice == BackendChoice::Local && !available {
                return Err(TiercadeError::LocalBackendUnavailable);
            }

            if available {
                match self.local.analyze(title, group).await {
                    Ok(text) => return Ok(text),
                    Err(e) if self.choice == BackendChoice::Local => return Err(e),
                    Err(e) => warn!("local analysis failed, falling through to cloud: {e}"),
                }
            }
        }

        self.cloud.analyze(title, group).await
    }

    async fn probe_local(&mut self) -> bool {
        if let Some(cached) = self.local_available {
            return cached;
        }
        let available = self.local.probe().await;
        debug!("local analysis backend available: {available}");
        self.local_available = Some(available);
        available
    }
}
