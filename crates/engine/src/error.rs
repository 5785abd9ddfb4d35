//! Engine error taxonomy.

use std::fmt;

use lattice_core::CoreError;
use lattice_store::StoreError;

use crate::notify::FanoutReport;

/// The chunked subtree an archive/restore failure occurred in. Root set and
/// delete failures are single writes and surface as [`EngineError::Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Comments-and-replies subtree.
    Comments,
    /// Issues-and-todos subtree.
    Issues,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comments => write!(f, "comments"),
            Self::Issues => write!(f, "issues"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The project root is missing from the namespace the operation reads
    /// from. Nothing has been written when this is returned.
    #[error("Project {project_id} not found in the {namespace} namespace")]
    ProjectNotFound {
        project_id: String,
        namespace: &'static str,
    },

    /// A chunk failed after earlier chunks in the same stage committed.
    /// Already-committed chunks stay applied; re-running the operation is
    /// safe and skips documents that were already moved.
    #[error(
        "{stage} stage partially committed: {committed_chunks}/{total_chunks} chunks applied: {source}"
    )]
    PartialCommit {
        stage: Stage,
        committed_chunks: usize,
        total_chunks: usize,
        source: StoreError,
    },

    /// Cancellation was observed between chunks. No rollback is performed.
    #[error("{stage} stage cancelled after {committed_chunks} committed chunks")]
    Cancelled {
        stage: Stage,
        committed_chunks: usize,
    },

    /// One or more per-recipient notification writes failed. Sibling writes
    /// were still attempted.
    #[error("Notification fan-out incomplete: {0}")]
    Fanout(FanoutReport),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
