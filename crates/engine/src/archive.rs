//! Project graph archival and restoration.
//!
//! [`GraphArchiver`] moves a project's entire nested graph from the active
//! namespace into the archive mirror; [`GraphRestorer`] is its exact
//! inverse. Both follow the same shape:
//!
//! 1. read the source root document (missing → fail fast, nothing written);
//! 2. materialize the destination root;
//! 3. move the comments/replies subtree, then the issues/todos subtree,
//!    each through sequential atomic batch chunks;
//! 4. delete the source root.
//!
//! A failure partway through a chunk sequence leaves a superset of the data
//! spread across both trees. That state is recoverable: re-running the same
//! operation re-plans from whatever still lives at the source, so documents
//! already moved are skipped and the move completes. Neither component
//! retries on its own.

use std::sync::Arc;

use lattice_store::paths::{self, Namespace};
use lattice_store::DocumentStore;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::chunk;
use crate::error::{EngineError, Stage};
use crate::tree;

/// Wire field toggled on the root document as it crosses namespaces.
const ARCHIVED_FLAG: &str = "isArchived";

/// Counts of documents moved by one archive/restore run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub comments: usize,
    pub replies: usize,
    pub issues: usize,
    pub todos: usize,
    /// Batch chunks committed across both subtrees.
    pub chunks: usize,
}

impl MoveReport {
    /// Total documents moved, excluding the root.
    pub fn documents(&self) -> usize {
        self.comments + self.replies + self.issues + self.todos
    }
}

/// Moves a project's graph from the active tree into the archive mirror.
pub struct GraphArchiver {
    store: Arc<dyn DocumentStore>,
}

impl GraphArchiver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Archive the project graph rooted at `projects/{project_id}`.
    ///
    /// On success the archive tree holds a structurally complete mirror and
    /// the active tree holds none of it. See the module docs for the
    /// partial-failure surface.
    pub async fn archive(
        &self,
        project_id: &str,
        cancel: &CancellationToken,
    ) -> Result<MoveReport, EngineError> {
        move_tree(&*self.store, Namespace::Active, project_id, cancel).await
    }
}

/// Moves an archived project's graph back into the active tree.
pub struct GraphRestorer {
    store: Arc<dyn DocumentStore>,
}

impl GraphRestorer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Restore the project graph rooted at `archives/{project_id}`.
    ///
    /// Fails fast with [`EngineError::ProjectNotFound`] if the archive root
    /// does not exist; no partial restore is attempted in that case.
    pub async fn restore(
        &self,
        project_id: &str,
        cancel: &CancellationToken,
    ) -> Result<MoveReport, EngineError> {
        move_tree(&*self.store, Namespace::Archive, project_id, cancel).await
    }
}

/// Move the whole project graph out of `from` into the mirrored namespace.
async fn move_tree(
    store: &dyn DocumentStore,
    from: Namespace,
    project_id: &str,
    cancel: &CancellationToken,
) -> Result<MoveReport, EngineError> {
    let to = from.other();
    let source_root = paths::project_doc(from, project_id);

    let Some(root) = store.get(&source_root).await? else {
        return Err(EngineError::ProjectNotFound {
            project_id: project_id.to_string(),
            namespace: from.root(),
        });
    };

    // Materialize the destination root first: it carries the creator and
    // member list, so access checks on the moved data work even if a later
    // stage fails. Full fields are copied so restore is field-for-field.
    let mut root_fields = root.fields;
    root_fields.insert(
        ARCHIVED_FLAG.to_string(),
        Value::Bool(to == Namespace::Archive),
    );
    store
        .set(&paths::project_doc(to, project_id), root_fields)
        .await?;

    let comment_plan = tree::plan_comments(store, from, project_id).await?;
    let comment_chunks = chunk::commit_in_chunks(store, comment_plan.ops, cancel)
        .await
        .map_err(|e| e.into_engine(Stage::Comments))?;

    let issue_plan = tree::plan_issues(store, from, project_id).await?;
    let issue_chunks = chunk::commit_in_chunks(store, issue_plan.ops, cancel)
        .await
        .map_err(|e| e.into_engine(Stage::Issues))?;

    // Demote the source root last, once the graph is fully mirrored.
    store.delete(&source_root).await?;

    let report = MoveReport {
        comments: comment_plan.parents,
        replies: comment_plan.children,
        issues: issue_plan.parents,
        todos: issue_plan.children,
        chunks: comment_chunks + issue_chunks,
    };
    tracing::info!(
        project_id,
        from = from.root(),
        to = to.root(),
        documents_moved = report.documents(),
        chunks_committed = report.chunks,
        "Project graph moved"
    );
    Ok(report)
}
