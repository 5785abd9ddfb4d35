//! Chunked atomic batch commits.
//!
//! A subtree move can carry more operations than the store accepts in one
//! batch. [`commit_in_chunks`] splits the plan at the store's limit and
//! commits the chunks sequentially; each chunk is atomic, the sequence as a
//! whole is not. A failure or cancellation partway through leaves the
//! already-committed chunks applied (copy-then-delete has no rollback) and
//! reports how far the sequence got so the caller can retry.

use lattice_core::types::Fields;
use lattice_store::{DocumentStore, StoreError};
use tokio_util::sync::CancellationToken;

use crate::error::{EngineError, Stage};

/// A single queued write or delete.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Set { path: String, fields: Fields },
    Delete { path: String },
}

impl WriteOp {
    /// Queue a create-or-overwrite of `path`.
    pub fn set(path: impl Into<String>, fields: Fields) -> Self {
        Self::Set {
            path: path.into(),
            fields,
        }
    }

    /// Queue a delete of `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete { path: path.into() }
    }
}

/// Why a chunk sequence stopped early.
#[derive(Debug)]
pub enum ChunkFailureKind {
    /// The chunk's batch commit failed.
    Failed(StoreError),
    /// Cancellation was observed before the chunk was submitted.
    Cancelled,
}

/// A chunk sequence that did not run to completion.
///
/// `committed_chunks` counts fully applied chunks; `0` means the sequence
/// never started.
#[derive(Debug)]
pub struct ChunkFailure {
    pub committed_chunks: usize,
    pub total_chunks: usize,
    pub kind: ChunkFailureKind,
}

impl ChunkFailure {
    /// Attach the stage this sequence belonged to.
    pub fn into_engine(self, stage: Stage) -> EngineError {
        match self.kind {
            ChunkFailureKind::Failed(source) => EngineError::PartialCommit {
                stage,
                committed_chunks: self.committed_chunks,
                total_chunks: self.total_chunks,
                source,
            },
            ChunkFailureKind::Cancelled => EngineError::Cancelled {
                stage,
                committed_chunks: self.committed_chunks,
            },
        }
    }
}

/// Commit `ops` as a sequence of atomic batches bounded by the store's
/// per-batch limit. Returns the number of chunks committed.
///
/// The cancellation token is checked between chunks only; an in-flight
/// batch is never abandoned and applied chunks are never rolled back.
pub async fn commit_in_chunks(
    store: &dyn DocumentStore,
    ops: Vec<WriteOp>,
    cancel: &CancellationToken,
) -> Result<usize, ChunkFailure> {
    if ops.is_empty() {
        return Ok(0);
    }

    let max = store.max_batch_ops().max(1);
    let chunks: Vec<&[WriteOp]> = ops.chunks(max).collect();
    let total_chunks = chunks.len();

    for (i, chunk) in chunks.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::warn!(
                committed_chunks = i,
                total_chunks,
                "Chunk sequence cancelled"
            );
            return Err(ChunkFailure {
                committed_chunks: i,
                total_chunks,
                kind: ChunkFailureKind::Cancelled,
            });
        }

        let mut batch = store.batch();
        for op in *chunk {
            match op {
                WriteOp::Set { path, fields } => batch.set(path, fields.clone()),
                WriteOp::Delete { path } => batch.delete(path),
            }
        }
        batch.commit().await.map_err(|e| {
            tracing::error!(
                committed_chunks = i,
                total_chunks,
                error = %e,
                "Chunk commit failed"
            );
            ChunkFailure {
                committed_chunks: i,
                total_chunks,
                kind: ChunkFailureKind::Failed(e),
            }
        })?;
    }

    Ok(total_chunks)
}
