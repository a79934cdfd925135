use crate::{
    domain::{Board, Direction},
    error::Result,
    storage::Storage,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Trailing-edge window for coalescing persistence of rapid mutations.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Where the board installed by [`TierState::load`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSource {
    Remote,
    Local,
    Default,
}

/// Outcome of a load: the chosen source plus any non-fatal storage trouble
/// encountered on the way there, suitable for a dismissible banner.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: BoardSource,
    pub warning: Option<String>,
}

/// Owns one board and brokers its persistence.
///
/// The in-memory board is the source of truth for the session; storage is a
/// best-effort mirror. Every successful mutation schedules a debounced
/// write-through carrying the latest snapshot, cancelling any write still
/// waiting in the window, so only the newest snapshot ever reaches storage.
/// A failed background write is logged and retried by whichever mutation
/// comes next.
pub struct TierState {
    board: Board,
    local: Arc<dyn Storage>,
    remote: Option<Arc<dyn Storage>>,
    identity: Option<String>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl TierState {
    /// Creates a state container over local-only storage, holding the
    /// built-in default board until [`load`](Self::load) is called.
    pub fn new(local: Arc<dyn Storage>) -> Self {
        Self {
            board: Board::default(),
            local,
            remote: None,
            identity: None,
            debounce: DEFAULT_DEBOUNCE,
            pending: None,
        }
    }

    /// Attaches the remote backend used while an identity is signed in.
    pub fn with_remote(mut self, remote: Arc<dyn Storage>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// True while a debounced write is still waiting for its window.
    pub fn has_pending_persist(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Installs a board from the first source that has one: the remote
    /// record for the signed-in identity, then local storage, then the
    /// built-in default. Storage trouble degrades to the next source and is
    /// reported in the returned warning, never as an error.
    pub async fn load(&mut self) -> LoadReport {
        let mut warnings = Vec::new();

        if let (Some(identity), Some(remote)) = (self.identity.as_deref(), self.remote.as_ref()) {
            match remote.load_board(Some(identity)).await {
                Ok(Some(board)) => {
                    self.board = board;
                    return LoadReport {
                        source: BoardSource::Remote,
                        warning: None,
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("remote board load failed: {e}");
                    warnings.push(format!("remote load failed: {e}"));
                }
            }
        }

        match self.local.load_board(None).await {
            Ok(Some(board)) => {
                self.board = board;
                return LoadReport {
                    source: BoardSource::Local,
                    warning: collect_warning(warnings),
                };
            }
            Ok(None) => {}
            Err(e) => {
                warn!("local board load failed: {e}");
                warnings.push(format!("local load failed: {e}"));
            }
        }

        self.board = Board::default();
        LoadReport {
            source: BoardSource::Default,
            warning: collect_warning(warnings),
        }
    }

    /// Switches to an authenticated identity, replacing the board wholesale
    /// from that identity's storage.
    pub async fn sign_in(&mut self, identity: impl Into<String>) -> LoadReport {
        self.identity = Some(identity.into());
        self.load().await
    }

    /// Drops the identity and reloads the anonymous board.
    pub async fn sign_out(&mut self) -> LoadReport {
        self.identity = None;
        self.load().await
    }

    pub fn move_item(&mut self, item: &str, from: usize, to: usize, position: usize) -> Result<()> {
        self.board.move_item(item, from, to, position)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn reorder_item(&mut self, tier: usize, from_pos: usize, to_pos: usize) -> Result<()> {
        self.board.reorder_item(tier, from_pos, to_pos)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn add_tier(&mut self, label: &str, color: Option<String>) -> Result<()> {
        self.board.add_tier(label, color)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn remove_tier(&mut self, index: usize) -> Result<()> {
        self.board.remove_tier(index)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn rename_tier(&mut self, index: usize, new_label: &str) -> Result<()> {
        self.board.rename_tier(index, new_label)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn recolor_tier(&mut self, index: usize, color: Option<String>) -> Result<()> {
        self.board.recolor_tier(index, color)?;
        self.schedule_persist();
        Ok(())
    }

    pub fn move_tier(&mut self, index: usize, direction: Direction) -> Result<()> {
        self.board.move_tier(index, direction)?;
        self.schedule_persist();
        Ok(())
    }

    /// Replaces the whole board with the built-in template.
    pub fn reset_to_default(&mut self) {
        self.board = Board::default();
        self.schedule_persist();
    }

    /// Writes the current board immediately, cancelling any pending
    /// debounced write. Intended for shutdown paths and tests.
    pub async fn flush(&mut self) -> Result<()> {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        let (storage, identity) = self.active_backend();
        storage.save_board(identity.as_deref(), &self.board).await
    }

    /// The backend mutations write through to: remote while signed in,
    /// local otherwise.
    fn active_backend(&self) -> (Arc<dyn Storage>, Option<String>) {
        match (&self.identity, &self.remote) {
            (Some(identity), Some(remote)) => (Arc::clone(remote), Some(identity.clone())),
            _ => (Arc::clone(&self.local), None),
        }
    }

    /// Cancels any write still waiting and installs a fresh delayed write
    /// holding the latest snapshot. Earlier snapshots in the window are
    /// dropped, never written.
    fn schedule_persist(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let (storage, identity) = self.active_backend();
        let snapshot = self.board.clone();
        let delay = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match storage.save_board(identity.as_deref(), &snapshot).await {
                Ok(()) => debug!("board persisted"),
                Err(e) => warn!("board persist failed: {e}"),
            }
        }));
    }
}

fn collect_warning(warnings: Vec<String>) -> Option<String> {
    if warnings.is_empty() {
        None
    } else {
        Some(warnings.join("; "))
    }
}
