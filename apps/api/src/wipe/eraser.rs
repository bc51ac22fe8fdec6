//! The wipe workflow as an explicit state machine:
//! `Idle → Loading → Loaded → ConfirmPending → Deleting → Loaded`.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::models::file::FileEntry;
use crate::wipe::storage::{StorageError, UserNamespaces};

#[derive(Debug, Error)]
pub enum EraserError {
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("No files to delete")]
    NothingToWipe,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EraserState {
    Idle,
    Loading,
    Loaded { files: Vec<FileEntry> },
    ConfirmPending { files: Vec<FileEntry> },
    Deleting,
}

impl EraserState {
    fn name(&self) -> &'static str {
        match self {
            EraserState::Idle => "idle",
            EraserState::Loading => "loading",
            EraserState::Loaded { .. } => "loaded",
            EraserState::ConfirmPending { .. } => "awaiting confirmation",
            EraserState::Deleting => "deleting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedDelete {
    pub path: String,
    pub error: String,
}

/// Per-object outcome of a wipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WipeReport {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDelete>,
    /// False when any delete failed (the clear is skipped) or the clear itself failed.
    pub kv_cleared: bool,
    pub kv_keys_removed: u64,
    pub kv_error: Option<String>,
    /// Listing taken after the wipe.
    pub remaining: Vec<FileEntry>,
}

impl WipeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.kv_cleared
    }
}

pub struct Eraser {
    namespaces: UserNamespaces,
    state: EraserState,
}

impl Eraser {
    pub fn new(namespaces: UserNamespaces) -> Self {
        Self {
            namespaces,
            state: EraserState::Idle,
        }
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &EraserState {
        &self.state
    }

    /// Lists the namespace. Allowed from `Idle` and `Loaded`; a failed list
    /// leaves the previous state in place.
    pub async fn load(&mut self) -> Result<&[FileEntry], EraserError> {
        if !matches!(self.state, EraserState::Idle | EraserState::Loaded { .. }) {
            return Err(EraserError::InvalidTransition {
                action: "load files",
                state: self.state.name(),
            });
        }
        let previous = std::mem::replace(&mut self.state, EraserState::Loading);

        match self.namespaces.files.list().await {
            Ok(files) => {
                self.state = EraserState::Loaded { files };
                Ok(self.files())
            }
            Err(e) => {
                self.state = previous;
                Err(e.into())
            }
        }
    }

    /// Files from the most recent listing.
    pub fn files(&self) -> &[FileEntry] {
        match &self.state {
            EraserState::Loaded { files } | EraserState::ConfirmPending { files } => files,
            _ => &[],
        }
    }

    /// Moves to `ConfirmPending`; returns how many files would be deleted.
    pub fn request_confirmation(&mut self) -> Result<usize, EraserError> {
        match std::mem::replace(&mut self.state, EraserState::Idle) {
            EraserState::Loaded { files } if files.is_empty() => {
                self.state = EraserState::Loaded { files };
                Err(EraserError::NothingToWipe)
            }
            EraserState::Loaded { files } => {
                let count = files.len();
                self.state = EraserState::ConfirmPending { files };
                Ok(count)
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(EraserError::InvalidTransition {
                    action: "request confirmation",
                    state,
                })
            }
        }
    }

    /// Backs out of `ConfirmPending`. The HTTP flow confirms in one request.
    #[allow(dead_code)]
    pub fn cancel(&mut self) -> Result<(), EraserError> {
        match std::mem::replace(&mut self.state, EraserState::Idle) {
            EraserState::ConfirmPending { files } => {
                self.state = EraserState::Loaded { files };
                Ok(())
            }
            other => {
                let state = other.name();
                self.state = other;
                Err(EraserError::InvalidTransition {
                    action: "cancel",
                    state,
                })
            }
        }
    }

    /// Deletes every listed file concurrently, clears the key-value namespace
    /// only if all deletes succeeded, then re-lists.
    ///
    /// A failed re-list leaves the eraser `Idle`; deletions already made stand.
    pub async fn confirm(&mut self) -> Result<WipeReport, EraserError> {
        let files = match std::mem::replace(&mut self.state, EraserState::Deleting) {
            EraserState::ConfirmPending { files } => files,
            other => {
                let state = other.name();
                self.state = other;
                return Err(EraserError::InvalidTransition {
                    action: "confirm",
                    state,
                });
            }
        };

        let (deleted, failed) = self.delete_all(&files).await;

        let (kv_cleared, kv_keys_removed, kv_error) = if failed.is_empty() {
            match self.namespaces.kv.clear().await {
                Ok(n) => (true, n, None),
                Err(e) => {
                    error!("Key-value clear failed after deleting {} files: {e}", deleted.len());
                    (false, 0, Some(e.to_string()))
                }
            }
        } else {
            warn!(
                "Skipping key-value clear: {} of {} deletes failed",
                failed.len(),
                files.len()
            );
            (false, 0, None)
        };

        let remaining = match self.namespaces.files.list().await {
            Ok(remaining) => remaining,
            Err(e) => {
                self.state = EraserState::Idle;
                return Err(e.into());
            }
        };
        self.state = EraserState::Loaded {
            files: remaining.clone(),
        };

        let report = WipeReport {
            deleted,
            failed,
            kv_cleared,
            kv_keys_removed,
            kv_error,
            remaining,
        };

        if report.is_complete() {
            info!(
                "Wiped {} files and {} keys",
                report.deleted.len(),
                report.kv_keys_removed
            );
        } else {
            error!(
                "Wipe incomplete: {} deleted, {} failed, {} remaining",
                report.deleted.len(),
                report.failed.len(),
                report.remaining.len()
            );
        }

        Ok(report)
    }

    /// Fans out one delete per file and collects every outcome, sorted by path.
    async fn delete_all(&self, files: &[FileEntry]) -> (Vec<String>, Vec<FailedDelete>) {
        let mut tasks = JoinSet::new();
        for file in files {
            let namespace = self.namespaces.files.clone();
            let path = file.path.clone();
            tasks.spawn(async move {
                let result = namespace.delete(&path).await;
                (path, result)
            });
        }

        let mut pending: BTreeSet<String> = files.iter().map(|f| f.path.clone()).collect();
        let mut deleted = Vec::new();
        let mut failed = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, Ok(()))) => {
                    pending.remove(&path);
                    deleted.push(path);
                }
                Ok((path, Err(e))) => {
                    pending.remove(&path);
                    failed.push(FailedDelete {
                        path,
                        error: e.to_string(),
                    });
                }
                Err(e) => error!("Delete task did not complete: {e}"),
            }
        }

        // Tasks that panicked never reported their path.
        failed.extend(pending.into_iter().map(|path| FailedDelete {
            path,
            error: "delete task did not complete".to_string(),
        }));

        deleted.sort();
        failed.sort_by(|a, b| a.path.cmp(&b.path));
        (deleted, failed)
    }
}
