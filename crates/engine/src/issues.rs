//! Issue creation with todo fan-in and assignee notifications.

use std::sync::Arc;

use chrono::Utc;
use lattice_core::issue::Issue;
use lattice_core::notification::Correlation;
use lattice_core::todo::Todo;
use lattice_core::CoreError;
use lattice_store::client::encode;
use lattice_store::paths::{self, Namespace};
use lattice_store::DocumentStore;
use tokio_util::sync::CancellationToken;

use crate::chunk::{self, WriteOp};
use crate::error::{EngineError, Stage};
use crate::notify::{FanoutReport, NotificationEmitter};

/// Creates issues (with their initial todos) on active projects.
pub struct IssueService {
    store: Arc<dyn DocumentStore>,
    emitter: NotificationEmitter,
}

impl IssueService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let emitter = NotificationEmitter::new(Arc::clone(&store));
        Self { store, emitter }
    }

    /// Write `issue` and its `todos` under `projects/{project_id}` in one
    /// atomic unit (chunked if oversized) and notify each distinct real
    /// assignee, excluding `actor_id`.
    pub async fn create_issue(
        &self,
        project_id: &str,
        actor_id: &str,
        issue: &Issue,
        todos: &[Todo],
        cancel: &CancellationToken,
    ) -> Result<FanoutReport, EngineError> {
        if issue.title.trim().is_empty() {
            return Err(CoreError::Validation("Issue title cannot be empty".to_string()).into());
        }

        let mut ops = vec![WriteOp::set(
            paths::issue_doc(Namespace::Active, project_id, &issue.id),
            encode(issue)?,
        )];
        for todo in todos {
            ops.push(WriteOp::set(
                paths::todo_doc(Namespace::Active, project_id, &issue.id, &todo.id),
                encode(todo)?,
            ));
        }
        chunk::commit_in_chunks(&*self.store, ops, cancel)
            .await
            .map_err(|e| e.into_engine(Stage::Issues))?;

        let recipients: Vec<_> = issue.real_assignees().cloned().collect();
        let message = format!("You were assigned to \"{}\"", issue.title);
        let report = self
            .emitter
            .emit(
                &recipients,
                actor_id,
                &message,
                &Correlation::issue(project_id, issue.id.clone()),
                Utc::now(),
            )
            .await;

        tracing::info!(
            project_id,
            issue_id = %issue.id,
            todos = todos.len(),
            notified = report.delivered,
            "Issue created"
        );
        Ok(report)
    }
}
