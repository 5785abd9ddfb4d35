//! Traversal planners for a project's nested document graph.
//!
//! Each function walks one subtree in the source namespace and produces the
//! copy-then-delete operation plan that moves it to the mirrored path in
//! the other namespace. Traversal enumerates live children only, so
//! re-planning after a partial failure naturally skips documents that were
//! already moved.

use lattice_store::paths::{self, Namespace};
use lattice_store::{DocumentStore, StoreError};

use crate::chunk::WriteOp;

/// Plan for one subtree: the operations plus moved-document counts.
pub(crate) struct SubtreePlan {
    pub ops: Vec<WriteOp>,
    /// Direct children moved (comments or issues).
    pub parents: usize,
    /// Grandchildren moved (replies or todos).
    pub children: usize,
}

/// Plan the move of every comment (and its replies) out of `from`.
pub(crate) async fn plan_comments(
    store: &dyn DocumentStore,
    from: Namespace,
    project_id: &str,
) -> Result<SubtreePlan, StoreError> {
    let to = from.other();
    let mut ops = Vec::new();
    let mut parents = 0;
    let mut children = 0;

    let comments = store
        .list_children(&paths::comments_collection(from, project_id))
        .await?;
    for comment in comments {
        ops.push(WriteOp::set(
            paths::comment_doc(to, project_id, &comment.id),
            comment.fields.clone(),
        ));

        let replies = store
            .list_children(&paths::replies_collection(from, project_id, &comment.id))
            .await?;
        for reply in replies {
            ops.push(WriteOp::set(
                paths::reply_doc(to, project_id, &comment.id, &reply.id),
                reply.fields,
            ));
            ops.push(WriteOp::delete(paths::reply_doc(
                from, project_id, &comment.id, &reply.id,
            )));
            children += 1;
        }

        ops.push(WriteOp::delete(paths::comment_doc(
            from, project_id, &comment.id,
        )));
        parents += 1;
    }

    Ok(SubtreePlan {
        ops,
        parents,
        children,
    })
}

/// Plan the move of every issue (and its todos) out of `from`.
pub(crate) async fn plan_issues(
    store: &dyn DocumentStore,
    from: Namespace,
    project_id: &str,
) -> Result<SubtreePlan, StoreError> {
    let to = from.other();
    let mut ops = Vec::new();
    let mut parents = 0;
    let mut children = 0;

    let issues = store
        .list_children(&paths::issues_collection(from, project_id))
        .await?;
    for issue in issues {
        ops.push(WriteOp::set(
            paths::issue_doc(to, project_id, &issue.id),
            issue.fields.clone(),
        ));

        let todos = store
            .list_children(&paths::todos_collection(from, project_id, &issue.id))
            .await?;
        for todo in todos {
            ops.push(WriteOp::set(
                paths::todo_doc(to, project_id, &issue.id, &todo.id),
                todo.fields,
            ));
            ops.push(WriteOp::delete(paths::todo_doc(
                from, project_id, &issue.id, &todo.id,
            )));
            children += 1;
        }

        ops.push(WriteOp::delete(paths::issue_doc(from, project_id, &issue.id)));
        parents += 1;
    }

    Ok(SubtreePlan {
        ops,
        parents,
        children,
    })
}
